//! # Product Create Store
//!
//! Drives the seller's product-creation wizard and syncs the draft with the
//! backend.
//!
//! ## Save Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save_progress()                                      │
//! │                                                                         │
//! │  1. Claim in-flight flag ─────── already set? ──► Err(SaveInFlight)    │
//! │         │                                                               │
//! │  2. Lock, clone draft + revision + draft id, unlock                    │
//! │         │                                                               │
//! │  3. api.save_draft(id, draft).await    (no lock held)                  │
//! │         │                                                               │
//! │         ├── Ok ──► lock, remember draft id,                            │
//! │         │          clear dirty only if revision unchanged               │
//! │         │                                                               │
//! │         └── Err ─► dirty stays set, error returned, no retry           │
//! │                                                                         │
//! │  4. Flag released when the guard drops (also if the future is dropped) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All methods take `&self`, so the store can sit behind an `Arc` and be
//! shared by UI handlers while a save is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use spyke_core::{
    CommissionOffer, CoreResult, DraftUpdate, FieldErrors, HowItWorksStep, ProductDraft,
    ProductWizard, WizardStep,
};
use tracing::{debug, info, warn};

use crate::api::{DraftApi, DraftRecord, SubmittedProduct};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct DraftState {
    wizard: ProductWizard,

    /// Backend id, known after the first successful save.
    draft_id: Option<String>,
}

/// Marks a save or submit as running until dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> StoreResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StoreError::SaveInFlight)?;
        Ok(InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Product-creation flow bound to a backend.
#[derive(Debug)]
pub struct ProductCreateStore<A> {
    api: A,
    state: Mutex<DraftState>,
    in_flight: AtomicBool,
}

impl<A: DraftApi> ProductCreateStore<A> {
    /// Starts a fresh flow on step 1.
    pub fn new(api: A) -> Self {
        ProductCreateStore {
            api,
            state: Mutex::new(DraftState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Starts a flow pre-filled with `draft` that the backend has not seen.
    pub fn from_draft(api: A, draft: ProductDraft) -> Self {
        ProductCreateStore {
            api,
            state: Mutex::new(DraftState {
                wizard: ProductWizard::from_draft(draft),
                draft_id: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Continues editing a draft the backend already holds.
    pub fn resume(api: A, draft_id: impl Into<String>, draft: ProductDraft) -> Self {
        ProductCreateStore {
            api,
            state: Mutex::new(DraftState {
                wizard: ProductWizard::from_draft(draft),
                draft_id: Some(draft_id.into()),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn state(&self) -> MutexGuard<'_, DraftState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the full wizard state for rendering.
    pub fn snapshot(&self) -> ProductWizard {
        self.state().wizard.clone()
    }

    pub fn draft(&self) -> ProductDraft {
        self.state().wizard.draft().clone()
    }

    pub fn current_step(&self) -> WizardStep {
        self.state().wizard.current_step()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state().wizard.errors().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state().wizard.is_dirty()
    }

    pub fn draft_id(&self) -> Option<String> {
        self.state().draft_id.clone()
    }

    /// Whether a save or submit is running.
    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validates a step without moving.
    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        self.state().wizard.validate_step(step)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn update(&self, update: DraftUpdate) {
        debug!(field = %update.field(), "Draft field updated");
        self.state().wizard.update(update);
    }

    pub fn add_tag(&self, tag: impl Into<String>) {
        self.state().wizard.add_tag(tag);
    }

    pub fn remove_tag(&self, tag: &str) {
        self.state().wizard.remove_tag(tag);
    }

    pub fn add_how_it_works_step(&self, step: HowItWorksStep) {
        self.state().wizard.add_how_it_works_step(step);
    }

    pub fn add_image(&self, url: impl Into<String>) {
        self.state().wizard.add_image(url);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Advances if the current step validates.
    pub fn next(&self) -> CoreResult<WizardStep> {
        let result = self.state().wizard.next();
        if let Ok(step) = result {
            debug!(%step, "Wizard advanced");
        }
        result
    }

    pub fn back(&self) -> CoreResult<WizardStep> {
        self.state().wizard.back()
    }

    pub fn go_to(&self, step: WizardStep) -> CoreResult<WizardStep> {
        self.state().wizard.go_to(step)
    }

    // =========================================================================
    // Backend Sync
    // =========================================================================

    /// Saves the draft to the backend.
    ///
    /// On success the backend draft id is remembered and the draft is marked
    /// clean, unless it was edited while the request was running. On failure
    /// nothing changes and the error is returned.
    pub async fn save_progress(&self) -> StoreResult<DraftRecord> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let (draft, draft_id, revision) = {
            let state = self.state();
            (
                state.wizard.draft().clone(),
                state.draft_id.clone(),
                state.wizard.revision(),
            )
        };

        let record = match self.api.save_draft(draft_id.as_deref(), &draft).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to save draft");
                return Err(e.into());
            }
        };

        let mut state = self.state();
        state.draft_id = Some(record.id.clone());
        let clean = state.wizard.mark_saved(revision);
        info!(draft_id = %record.id, clean, "Draft saved");

        Ok(record)
    }

    /// Publishes the draft.
    ///
    /// Requires an accepted commission offer and the review step, and every
    /// step must validate. Success starts a fresh flow; failure keeps the
    /// draft as it is.
    pub async fn submit(&self, commission: &CommissionOffer) -> StoreResult<SubmittedProduct> {
        commission.ensure_accepted()?;
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let (draft, draft_id) = {
            let mut state = self.state();
            state.wizard.ready_to_submit()?;
            (state.wizard.draft().clone(), state.draft_id.clone())
        };

        let product = match self.api.submit_product(draft_id.as_deref(), &draft).await {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %e, "Failed to submit product");
                return Err(e.into());
            }
        };

        *self.state() = DraftState::default();
        info!(product_id = %product.id, "Product submitted");

        Ok(product)
    }
}
