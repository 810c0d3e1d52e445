//! Sheet form abstraction.
//!
//! The controller only ever touches the page through these traits:
//! fields addressed by element id (`str_score`, `str_mod`, ...) and skill
//! rows addressed by class name. Every lookup is fallible by returning
//! `None`/`false`; a missing element is never an error.

use std::rc::Rc;

/// Callback registered against a form event.
///
/// Single-threaded: listeners run on the page's event loop.
pub type Listener = Rc<dyn Fn()>;

/// The parts of a skill row, keyed by the class name each element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowPart {
    /// Mirror of the governing ability's modifier
    AbilityModifier,
    Ranks,
    Misc,
    /// Class-skill checkbox
    ClassSkill,
    Total,
}

impl RowPart {
    pub const ALL: [RowPart; 5] = [
        Self::AbilityModifier,
        Self::Ranks,
        Self::Misc,
        Self::ClassSkill,
        Self::Total,
    ];

    /// CSS class of the element inside a `.skill-row`.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::AbilityModifier => "skill-abil-mod",
            Self::Ranks => "skill-ranks",
            Self::Misc => "skill-misc",
            Self::ClassSkill => "skill-class-cb",
            Self::Total => "skill-total",
        }
    }
}

/// CSS class marking a skill row.
pub const SKILL_ROW_CLASS: &str = "skill-row";

/// Attribute naming the ability that governs a skill row.
pub const ROW_ABILITY_ATTRIBUTE: &str = "data-ability";

/// Access to the sheet page.
pub trait FormDocument: 'static {
    type Row: SkillRowElement;

    /// Current text of the field with `id`, or `None` if there is no such field.
    fn field_value(&self, id: &str) -> Option<String>;

    /// Overwrite the text of the field with `id`. Returns `false` if absent.
    fn set_field_value(&self, id: &str, value: &str) -> bool;

    /// Fire a synthetic `change` event on the field with `id`, running its
    /// listeners synchronously. No-op if absent.
    fn dispatch_change(&self, id: &str);

    /// Register a `change` listener on the field with `id`. Listeners run in
    /// registration order. Returns `false` if absent.
    fn on_field_change(&self, id: &str, listener: Listener) -> bool;

    /// Every skill row currently on the page, in document order.
    fn skill_rows(&self) -> Vec<Self::Row>;
}

/// One `.skill-row` element and its descendants.
pub trait SkillRowElement: Clone + 'static {
    /// Raw `data-ability` value, if present.
    fn ability_code(&self) -> Option<String>;

    /// Current text of a part, or `None` if the row lacks it.
    fn part_value(&self, part: RowPart) -> Option<String>;

    /// Overwrite the text of a part. Returns `false` if the row lacks it.
    fn set_part_value(&self, part: RowPart, value: &str) -> bool;

    /// Checked state of a checkbox part; `false` if the row lacks it.
    fn is_checked(&self, part: RowPart) -> bool;

    /// Register `listener` for both `input` (interim) and `change`
    /// (committed) events on every input inside the row.
    fn on_edit(&self, listener: Listener);
}
