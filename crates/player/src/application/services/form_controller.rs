//! Form Controller - keeps the sheet's derived fields in step with its inputs.
//!
//! Every derived value is recomputed from the current field text whenever a
//! relevant input changes; nothing is cached between events. Unparseable
//! input falls back to a default (10 for scores, 0 for everything else) and
//! missing elements are skipped, so there is no error path.
//!
//! Ordering relies on the page's single event loop:
//! 1. A score `change` runs its modifier listener first (registered first).
//! 2. The same event then defers a pass over every skill row, which runs
//!    after the modifier text has been written.
//! 3. On attach, one extra pass is deferred by the seed delay so rows pick
//!    up the seeded modifiers.

use std::rc::Rc;

use charsheet_domain::{
    form_int_or, Ability, Modifier, SkillRowInput, DEFAULT_ABILITY_SCORE, DEFAULT_MISC,
    DEFAULT_RANKS,
};
use tracing::{debug, info, trace};

use crate::ports::outbound::{FormDocument, RowPart, Scheduler, SkillRowElement};
use crate::runner::config::ControllerConfig;

/// Mirrored into a row when its ability modifier field is missing or empty.
const EMPTY_MODIFIER_TEXT: &str = "0";

/// Add `delta` to the integer in field `field_id` and fire `change` on it.
///
/// Unparseable text counts as 0. No bounds are enforced beyond `i32`
/// saturation. No-op if the field is absent.
pub fn adjust_value<D: FormDocument>(document: &D, field_id: &str, delta: i32) {
    let Some(raw) = document.field_value(field_id) else {
        trace!(field_id, "adjust_value: no such field");
        return;
    };

    let value = form_int_or(Some(&raw), 0).saturating_add(delta);
    document.set_field_value(field_id, &value.to_string());
    debug!(field_id, delta, value, "Adjusted field value");
    document.dispatch_change(field_id);
}

/// Reactive controller for one sheet page.
pub struct FormController<D: FormDocument, S: Scheduler> {
    document: D,
    scheduler: S,
    config: ControllerConfig,
}

impl<D: FormDocument, S: Scheduler> FormController<D, S> {
    /// Build a controller without wiring any listeners.
    pub fn new(document: D, scheduler: S, config: ControllerConfig) -> Self {
        Self {
            document,
            scheduler,
            config,
        }
    }

    /// Build a controller, wire it to the page, and seed every derived field.
    ///
    /// Listeners hold weak references, so the caller must keep the returned
    /// `Rc` alive for as long as the page should stay reactive.
    pub fn attach(document: D, scheduler: S, config: ControllerConfig) -> Rc<Self> {
        let controller = Rc::new(Self::new(document, scheduler, config));
        controller.wire();
        controller
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn wire(self: &Rc<Self>) {
        let mut seeded = 0;
        for ability in Ability::ALL {
            let score_id = ability.score_field_id();
            if self.document.field_value(&ability.modifier_field_id()).is_none() {
                continue;
            }

            let weak = Rc::downgrade(self);
            let registered = self.document.on_field_change(
                &score_id,
                Rc::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.recompute_modifier(ability);
                    }
                }),
            );
            if registered {
                self.document.dispatch_change(&score_id);
                seeded += 1;
            }
        }

        let rows = self.document.skill_rows();
        for row in &rows {
            let weak = Rc::downgrade(self);
            let target = row.clone();
            row.on_edit(Rc::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.recompute_skill_row(&target);
                }
            }));
        }

        // Registered after seeding so the initial dispatches above do not
        // each queue a pass; the seed pass below covers them.
        for ability in Ability::ALL {
            let weak = Rc::downgrade(self);
            self.document.on_field_change(
                &ability.score_field_id(),
                Rc::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.schedule_full_pass(controller.config.rescan_delay_ms);
                    }
                }),
            );
        }

        self.schedule_full_pass(self.config.seed_delay_ms);

        info!(
            abilities = seeded,
            skill_rows = rows.len(),
            seed_delay_ms = self.config.seed_delay_ms,
            "Form controller attached"
        );
    }

    fn schedule_full_pass(self: &Rc<Self>, delay_ms: u32) {
        let weak = Rc::downgrade(self);
        self.scheduler.defer(
            delay_ms,
            Box::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.recompute_all_skill_rows();
                }
            }),
        );
    }

    /// Write the signed modifier for `ability`'s current score.
    pub fn recompute_modifier(&self, ability: Ability) {
        let Some(raw) = self.document.field_value(&ability.score_field_id()) else {
            return;
        };

        let score = form_int_or(Some(&raw), DEFAULT_ABILITY_SCORE);
        let modifier = Modifier::from_score(score);
        if self
            .document
            .set_field_value(&ability.modifier_field_id(), &modifier.to_string())
        {
            debug!(ability = %ability, score, modifier = %modifier, "Recomputed ability modifier");
        }
    }

    /// Mirror the governing modifier into `row` and rewrite its total.
    pub fn recompute_skill_row(&self, row: &D::Row) {
        let ability = row
            .ability_code()
            .and_then(|code| code.parse::<Ability>().ok());

        let modifier_text = ability
            .and_then(|a| self.document.field_value(&a.modifier_field_id()))
            .filter(|text| !text.is_empty());
        let modifier = Modifier::from_display(modifier_text.as_deref());

        row.set_part_value(
            RowPart::AbilityModifier,
            modifier_text.as_deref().unwrap_or(EMPTY_MODIFIER_TEXT),
        );

        let input = SkillRowInput::new(
            modifier.value(),
            form_int_or(row.part_value(RowPart::Ranks).as_deref(), DEFAULT_RANKS),
            form_int_or(row.part_value(RowPart::Misc).as_deref(), DEFAULT_MISC),
            row.is_checked(RowPart::ClassSkill),
        );
        let total = input.total();
        row.set_part_value(RowPart::Total, &total.to_string());

        trace!(
            ability = ability.map(|a| a.code()),
            modifier = input.modifier,
            ranks = input.ranks,
            misc = input.misc,
            class_skill = input.class_skill,
            total,
            "Recomputed skill row"
        );
    }

    /// Recompute every skill row on the page.
    pub fn recompute_all_skill_rows(&self) {
        let rows = self.document.skill_rows();
        for row in &rows {
            self.recompute_skill_row(row);
        }
        debug!(rows = rows.len(), "Recomputed all skill rows");
    }
}
