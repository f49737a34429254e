//! # Product Creation Wizard
//!
//! Six ordered steps followed by a review screen.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Wizard Transitions                                   │
//! │                                                                         │
//! │   ┌────────┐ Next ┌────────────┐ Next ┌───────┐ Next ┌─────────┐       │
//! │   │ Basics │─────►│ HowItWorks │─────►│ Media │─────►│ Pricing │──┐    │
//! │   │  (1)   │◄─────│    (2)     │◄─────│  (3)  │◄─────│   (4)   │  │    │
//! │   └────────┘ Back └────────────┘ Back └───────┘ Back └─────────┘  │    │
//! │                                                                   │    │
//! │        ┌──────────────────────────────────────────────────────────┘    │
//! │        ▼ Next                                                          │
//! │   ┌─────────┐ Next ┌─────────┐ Next ┌────────┐                         │
//! │   │ Details │─────►│ Support │─────►│ Review │──► submit (store)        │
//! │   │   (5)   │◄─────│   (6)   │◄─────│        │                          │
//! │   └─────────┘ Back └─────────┘ Back └────────┘                          │
//! │                                                                         │
//! │  "Next" only fires when validate_step(current) is empty.               │
//! │  "Back" always fires. "GoTo" forward needs every earlier step valid.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::{DraftField, DraftUpdate, HowItWorksStep, ProductDraft};
use crate::error::{CoreError, CoreResult, FieldErrors, ValidationError};
use crate::validation::{
    validate_count, validate_email, validate_price, validate_required, validate_tags,
    validate_text, validate_url,
};
use crate::{
    FULL_DESCRIPTION_MIN_LEN, MAX_HOW_IT_WORKS_STEPS, MAX_IMAGES, MAX_TAGS,
    SHORT_DESCRIPTION_MAX_LEN, TEXT_MAX_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN,
};

// =============================================================================
// Wizard Step
// =============================================================================

/// Where the seller is in the creation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Step 1: title, type, category, industry, descriptions.
    #[default]
    Basics,
    /// Step 2: how the product works.
    HowItWorks,
    /// Step 3: images.
    Media,
    /// Step 4: price.
    Pricing,
    /// Step 5: tags, setup time, requirements.
    Details,
    /// Step 6: support contact and demo link.
    Support,
    /// Terminal screen; the only action left is submit.
    Review,
}

impl WizardStep {
    /// The numbered steps, in order.
    pub const STEPS: [WizardStep; 6] = [
        WizardStep::Basics,
        WizardStep::HowItWorks,
        WizardStep::Media,
        WizardStep::Pricing,
        WizardStep::Details,
        WizardStep::Support,
    ];

    /// Step number as shown in the progress bar (1-6, Review is 7).
    pub const fn number(&self) -> u8 {
        match self {
            WizardStep::Basics => 1,
            WizardStep::HowItWorks => 2,
            WizardStep::Media => 3,
            WizardStep::Pricing => 4,
            WizardStep::Details => 5,
            WizardStep::Support => 6,
            WizardStep::Review => 7,
        }
    }

    /// Looks up a numbered step (1-6).
    pub fn from_number(n: u8) -> Option<Self> {
        Self::STEPS.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub const fn next(&self) -> Self {
        match self {
            WizardStep::Basics => WizardStep::HowItWorks,
            WizardStep::HowItWorks => WizardStep::Media,
            WizardStep::Media => WizardStep::Pricing,
            WizardStep::Pricing => WizardStep::Details,
            WizardStep::Details => WizardStep::Support,
            WizardStep::Support | WizardStep::Review => WizardStep::Review,
        }
    }

    pub const fn previous(&self) -> Self {
        match self {
            WizardStep::Basics | WizardStep::HowItWorks => WizardStep::Basics,
            WizardStep::Media => WizardStep::HowItWorks,
            WizardStep::Pricing => WizardStep::Media,
            WizardStep::Details => WizardStep::Pricing,
            WizardStep::Support => WizardStep::Details,
            WizardStep::Review => WizardStep::Support,
        }
    }

    /// Fields validated on this step.
    pub const fn fields(&self) -> &'static [DraftField] {
        match self {
            WizardStep::Basics => &[
                DraftField::Title,
                DraftField::ProductType,
                DraftField::Category,
                DraftField::Industry,
                DraftField::ShortDescription,
                DraftField::FullDescription,
            ],
            WizardStep::HowItWorks => &[DraftField::HowItWorks],
            WizardStep::Media => &[DraftField::Images],
            WizardStep::Pricing => &[DraftField::Price, DraftField::OriginalPrice],
            WizardStep::Details => &[
                DraftField::Tags,
                DraftField::SetupTime,
                DraftField::Requirements,
            ],
            WizardStep::Support => &[DraftField::SupportEmail, DraftField::DemoUrl],
            WizardStep::Review => &[],
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Basics => "basics",
            WizardStep::HowItWorks => "how_it_works",
            WizardStep::Media => "media",
            WizardStep::Pricing => "pricing",
            WizardStep::Details => "details",
            WizardStep::Support => "support",
            WizardStep::Review => "review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Step Validation
// =============================================================================

/// Validates the fields of one step against the draft.
///
/// Pure function of the draft: the same draft always yields the same map.
/// Review has nothing of its own to validate.
///
/// ## Example
/// ```rust
/// use spyke_core::draft::{DraftField, ProductDraft};
/// use spyke_core::wizard::{validate_step, WizardStep};
///
/// let draft = ProductDraft::new();
/// let errors = validate_step(WizardStep::Basics, &draft);
/// assert_eq!(errors.get(DraftField::Title), Some("title is required"));
/// ```
pub fn validate_step(step: WizardStep, draft: &ProductDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        WizardStep::Basics => {
            errors.check(
                DraftField::Title,
                validate_text("title", &draft.title, TITLE_MIN_LEN, TITLE_MAX_LEN),
            );
            errors.check(
                DraftField::ProductType,
                validate_required("type", &draft.product_type),
            );
            errors.check(
                DraftField::Category,
                validate_required("category", &draft.category),
            );
            errors.check(
                DraftField::Industry,
                validate_required("industry", &draft.industry),
            );
            errors.check(
                DraftField::ShortDescription,
                validate_text(
                    "shortDescription",
                    &draft.short_description,
                    1,
                    SHORT_DESCRIPTION_MAX_LEN,
                ),
            );
            errors.check(
                DraftField::FullDescription,
                validate_text(
                    "fullDescription",
                    &draft.full_description,
                    FULL_DESCRIPTION_MIN_LEN,
                    TEXT_MAX_LEN,
                ),
            );
        }
        WizardStep::HowItWorks => {
            let result = validate_count(
                "howItWorks",
                draft.how_it_works.len(),
                1,
                MAX_HOW_IT_WORKS_STEPS,
            )
            .and_then(|()| {
                draft.how_it_works.iter().try_for_each(|step| {
                    validate_required("howItWorks", &step.title)?;
                    validate_required("howItWorks", &step.description)
                })
            });
            errors.check(DraftField::HowItWorks, result);
        }
        WizardStep::Media => {
            let result = validate_count("images", draft.images.len(), 1, MAX_IMAGES)
                .and_then(|()| {
                    draft
                        .images
                        .iter()
                        .try_for_each(|url| validate_url("images", url))
                });
            errors.check(DraftField::Images, result);
        }
        WizardStep::Pricing => {
            errors.check(DraftField::Price, validate_price("price", draft.price));
            if let Some(original) = draft.original_price {
                if original < draft.price {
                    errors.insert(
                        DraftField::OriginalPrice,
                        &ValidationError::InvalidFormat {
                            field: "originalPrice".to_string(),
                            reason: format!("must not be lower than the price ({})", draft.price),
                        },
                    );
                }
            }
        }
        WizardStep::Details => {
            let result = validate_count("tags", draft.tags.len(), 1, MAX_TAGS)
                .and_then(|()| validate_tags("tags", &draft.tags));
            errors.check(DraftField::Tags, result);
            errors.check(
                DraftField::SetupTime,
                validate_required("setupTime", &draft.setup_time),
            );
            errors.check(
                DraftField::Requirements,
                draft
                    .requirements
                    .iter()
                    .try_for_each(|r| validate_required("requirements", r)),
            );
        }
        WizardStep::Support => {
            errors.check(
                DraftField::SupportEmail,
                validate_email("supportEmail", &draft.support_email),
            );
            if let Some(url) = draft.demo_url.as_deref().filter(|u| !u.trim().is_empty()) {
                errors.check(DraftField::DemoUrl, validate_url("demoUrl", url));
            }
        }
        WizardStep::Review => {}
    }

    errors
}

/// Validates every numbered step, returning the first one that fails.
pub fn validate_all(draft: &ProductDraft) -> CoreResult<()> {
    for step in WizardStep::STEPS {
        let errors = validate_step(step, draft);
        if !errors.is_empty() {
            return Err(CoreError::StepIncomplete { step, errors });
        }
    }
    Ok(())
}

// =============================================================================
// Transitions
// =============================================================================

/// Navigation requested by the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "step")]
pub enum WizardAction {
    Next,
    Back,
    GoTo(WizardStep),
}

/// The transition function `(step, action) -> step | errors`.
///
/// ## Rules
/// - `Next`: current step must validate; Support advances to Review
/// - `Back`: always allowed; Basics stays on Basics
/// - `GoTo`: backward (or same) always allowed; forward requires every step
///   before the target to validate, and reports the first that does not
pub fn transition(
    current: WizardStep,
    action: WizardAction,
    draft: &ProductDraft,
) -> CoreResult<WizardStep> {
    match action {
        WizardAction::Next => {
            let errors = validate_step(current, draft);
            if errors.is_empty() {
                Ok(current.next())
            } else {
                Err(CoreError::StepIncomplete {
                    step: current,
                    errors,
                })
            }
        }
        WizardAction::Back => Ok(current.previous()),
        WizardAction::GoTo(target) if target <= current => Ok(target),
        WizardAction::GoTo(target) => {
            for step in WizardStep::STEPS.iter().copied().filter(|s| *s < target) {
                let errors = validate_step(step, draft);
                if !errors.is_empty() {
                    return Err(CoreError::StepIncomplete { step, errors });
                }
            }
            Ok(target)
        }
    }
}

// =============================================================================
// Product Wizard
// =============================================================================

/// Draft plus wizard bookkeeping: current step, inline errors, dirty flag.
///
/// `revision` increases on every mutation so a save that started before an
/// edit can tell that the draft moved on while it was in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductWizard {
    draft: ProductDraft,
    current_step: WizardStep,
    errors: FieldErrors,
    is_dirty: bool,
    #[ts(type = "number")]
    revision: u64,
}

impl ProductWizard {
    /// Starts a new, empty creation flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a draft loaded from the backend (clean, on step 1).
    pub fn from_draft(draft: ProductDraft) -> Self {
        ProductWizard {
            draft,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets a single field, marks the draft dirty and clears that field's error.
    pub fn update(&mut self, update: DraftUpdate) {
        let field = self.draft.apply(update);
        self.touch(field);
    }

    /// Appends a tag unless an equal one (ignoring case) is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty()
            || self
                .draft
                .tags
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(tag))
        {
            return;
        }
        self.draft.tags.push(tag.to_string());
        self.touch(DraftField::Tags);
    }

    /// Removes a tag (ignoring case).
    pub fn remove_tag(&mut self, tag: &str) {
        let before = self.draft.tags.len();
        self.draft
            .tags
            .retain(|t| !t.trim().eq_ignore_ascii_case(tag.trim()));
        if self.draft.tags.len() != before {
            self.touch(DraftField::Tags);
        }
    }

    pub fn add_how_it_works_step(&mut self, step: HowItWorksStep) {
        self.draft.how_it_works.push(step);
        self.touch(DraftField::HowItWorks);
    }

    pub fn add_image(&mut self, url: impl Into<String>) {
        self.draft.images.push(url.into());
        self.touch(DraftField::Images);
    }

    /// Validates a step without moving.
    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        validate_step(step, &self.draft)
    }

    /// Applies a navigation action.
    ///
    /// On success the error map is cleared and the new step is returned. On
    /// failure the step stays put and the failing step's errors replace the
    /// error map.
    pub fn apply(&mut self, action: WizardAction) -> CoreResult<WizardStep> {
        match transition(self.current_step, action, &self.draft) {
            Ok(step) => {
                self.current_step = step;
                self.errors = FieldErrors::new();
                Ok(step)
            }
            Err(CoreError::StepIncomplete { step, errors }) => {
                self.errors = errors.clone();
                Err(CoreError::StepIncomplete { step, errors })
            }
            Err(e) => Err(e),
        }
    }

    pub fn next(&mut self) -> CoreResult<WizardStep> {
        self.apply(WizardAction::Next)
    }

    pub fn back(&mut self) -> CoreResult<WizardStep> {
        self.apply(WizardAction::Back)
    }

    pub fn go_to(&mut self, step: WizardStep) -> CoreResult<WizardStep> {
        self.apply(WizardAction::GoTo(step))
    }

    /// Checks the draft is ready to be submitted.
    ///
    /// Requires the review screen and every step to validate. A failing
    /// step's errors are copied into the error map.
    pub fn ready_to_submit(&mut self) -> CoreResult<()> {
        if self.current_step != WizardStep::Review {
            return Err(CoreError::NotInReview {
                current: self.current_step,
            });
        }
        validate_all(&self.draft).inspect_err(|e| {
            if let CoreError::StepIncomplete { errors, .. } = e {
                self.errors = errors.clone();
            }
        })
    }

    /// Marks the draft clean if nothing changed since `revision` was read.
    ///
    /// Returns whether the draft is now clean.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        if self.revision == revision {
            self.is_dirty = false;
        }
        !self.is_dirty
    }

    fn touch(&mut self, field: DraftField) {
        self.is_dirty = true;
        self.revision += 1;
        self.errors.clear(field);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
