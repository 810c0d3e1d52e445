//! In-memory form document.
//!
//! Models just enough of a page for the controller: fields by id with
//! `change` listeners, and skill rows with parts and edit listeners.
//! Listeners run synchronously, in registration order, exactly like DOM
//! event dispatch.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use charsheet_domain::{Ability, CharacterSheet};

use crate::ports::outbound::{FormDocument, Listener, RowPart, SkillRowElement};

/// Value of a checkbox input, as browsers report it.
const CHECKBOX_VALUE: &str = "on";

#[derive(Default)]
struct MemoryField {
    value: String,
    listeners: Vec<Listener>,
}

#[derive(Default)]
struct DocumentState {
    fields: BTreeMap<String, MemoryField>,
    rows: Vec<MemorySkillRow>,
}

/// A sheet page held in memory. Clones share the same page.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    inner: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    /// An empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with `{code}_score` = "10" and an empty `{code}_mod` for every
    /// ability.
    pub fn with_ability_fields() -> Self {
        let document = Self::new();
        for ability in Ability::ALL {
            document.add_field(&ability.score_field_id(), "10");
            document.add_field(&ability.modifier_field_id(), "");
        }
        document
    }

    /// Lay out `sheet` the way the sheet page renders it: score inputs, empty
    /// modifier fields, and one row per skill with empty derived parts.
    pub fn from_sheet(sheet: &CharacterSheet) -> Self {
        let document = Self::with_ability_fields();
        for (ability, score) in sheet.abilities.iter() {
            document.set_field_value(&ability.score_field_id(), &score.to_string());
        }
        for skill in &sheet.skills {
            let row = MemorySkillRow::new(Some(skill.ability.code()))
                .with_label(&skill.name)
                .with_part(RowPart::Ranks, &skill.ranks.to_string())
                .with_part(RowPart::Misc, &skill.misc.to_string())
                .with_class_skill(skill.class_skill);
            document.add_skill_row(row);
        }
        document
    }

    /// Builder-style [`MemoryDocument::add_field`].
    pub fn with_field(self, id: &str, value: &str) -> Self {
        self.add_field(id, value);
        self
    }

    /// Add a field, or reset the value of an existing one.
    pub fn add_field(&self, id: &str, value: &str) {
        self.inner
            .borrow_mut()
            .fields
            .entry(id.to_string())
            .or_default()
            .value = value.to_string();
    }

    pub fn add_skill_row(&self, row: MemorySkillRow) {
        self.inner.borrow_mut().rows.push(row);
    }

    /// Simulate the user committing `value` into field `id`.
    pub fn type_into(&self, id: &str, value: &str) {
        if self.set_field_value(id, value) {
            self.dispatch_change(id);
        }
    }

    /// Current text of every field, keyed by id.
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.inner
            .borrow()
            .fields
            .iter()
            .map(|(id, field)| (id.clone(), field.value.clone()))
            .collect()
    }
}

impl FormDocument for MemoryDocument {
    type Row = MemorySkillRow;

    fn field_value(&self, id: &str) -> Option<String> {
        self.inner
            .borrow()
            .fields
            .get(id)
            .map(|field| field.value.clone())
    }

    fn set_field_value(&self, id: &str, value: &str) -> bool {
        match self.inner.borrow_mut().fields.get_mut(id) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn dispatch_change(&self, id: &str) {
        // Listeners may write back into the page, so run them unborrowed.
        let listeners = self
            .inner
            .borrow()
            .fields
            .get(id)
            .map(|field| field.listeners.clone())
            .unwrap_or_default();
        for listener in listeners {
            listener();
        }
    }

    fn on_field_change(&self, id: &str, listener: Listener) -> bool {
        match self.inner.borrow_mut().fields.get_mut(id) {
            Some(field) => {
                field.listeners.push(listener);
                true
            }
            None => false,
        }
    }

    fn skill_rows(&self) -> Vec<MemorySkillRow> {
        self.inner.borrow().rows.clone()
    }
}

struct RowState {
    label: Option<String>,
    ability: Option<String>,
    parts: HashMap<RowPart, String>,
    checked: bool,
    listeners: Vec<Listener>,
}

/// One in-memory skill row. Clones share the same row.
#[derive(Clone)]
pub struct MemorySkillRow {
    inner: Rc<RefCell<RowState>>,
}

impl MemorySkillRow {
    /// A row governed by `ability` with every part present and empty, and the
    /// class-skill box unchecked.
    pub fn new(ability: Option<&str>) -> Self {
        let parts = RowPart::ALL
            .into_iter()
            .map(|part| {
                let value = if part == RowPart::ClassSkill {
                    CHECKBOX_VALUE
                } else {
                    ""
                };
                (part, value.to_string())
            })
            .collect();

        Self {
            inner: Rc::new(RefCell::new(RowState {
                label: None,
                ability: ability.map(str::to_string),
                parts,
                checked: false,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn with_label(self, label: &str) -> Self {
        self.inner.borrow_mut().label = Some(label.to_string());
        self
    }

    pub fn with_part(self, part: RowPart, value: &str) -> Self {
        self.inner
            .borrow_mut()
            .parts
            .insert(part, value.to_string());
        self
    }

    pub fn without_part(self, part: RowPart) -> Self {
        self.inner.borrow_mut().parts.remove(&part);
        self
    }

    pub fn with_class_skill(self, checked: bool) -> Self {
        self.inner.borrow_mut().checked = checked;
        self
    }

    pub fn label(&self) -> Option<String> {
        self.inner.borrow().label.clone()
    }

    /// Simulate the user typing `value` into `part`. No-op if the part is absent.
    pub fn edit(&self, part: RowPart, value: &str) {
        if self.set_part_value(part, value) {
            self.fire();
        }
    }

    /// Simulate the user toggling the class-skill box.
    pub fn set_checked(&self, checked: bool) {
        if !self.inner.borrow().parts.contains_key(&RowPart::ClassSkill) {
            return;
        }
        self.inner.borrow_mut().checked = checked;
        self.fire();
    }

    fn fire(&self) {
        let listeners = self.inner.borrow().listeners.clone();
        for listener in listeners {
            listener();
        }
    }
}

impl SkillRowElement for MemorySkillRow {
    fn ability_code(&self) -> Option<String> {
        self.inner.borrow().ability.clone()
    }

    fn part_value(&self, part: RowPart) -> Option<String> {
        self.inner.borrow().parts.get(&part).cloned()
    }

    fn set_part_value(&self, part: RowPart, value: &str) -> bool {
        match self.inner.borrow_mut().parts.get_mut(&part) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn is_checked(&self, part: RowPart) -> bool {
        let state = self.inner.borrow();
        state.parts.contains_key(&part) && state.checked
    }

    fn on_edit(&self, listener: Listener) {
        self.inner.borrow_mut().listeners.push(listener);
    }
}
