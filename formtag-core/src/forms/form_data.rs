//! Form field bookkeeping and AcroForm generation

use crate::actions::ScriptTrigger;
use crate::forms::{FormField, Widget};
use crate::objects::{Dictionary, Object, ObjectReference};
use std::collections::HashMap;

/// Interactive form dictionary (AcroForm)
#[derive(Debug, Clone, PartialEq)]
pub struct AcroForm {
    pub fields: Vec<ObjectReference>,
    pub need_appearances: bool,
    /// Signature flags; bit 1 means the document holds signature fields
    pub sig_flags: Option<i32>,
    /// Calculation order
    pub co: Vec<ObjectReference>,
    pub da: Option<String>,
}

impl Default for AcroForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AcroForm {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            need_appearances: true,
            sig_flags: None,
            co: Vec::new(),
            da: Some("/Helv 12 Tf 0 g".to_string()),
        }
    }

    pub fn add_field(&mut self, field_ref: ObjectReference) {
        self.fields.push(field_ref);
    }

    /// Convert to dictionary
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();

        let fields: Vec<Object> = self.fields.iter().map(|r| Object::Reference(*r)).collect();
        dict.set("Fields", Object::Array(fields));
        dict.set("NeedAppearances", Object::Boolean(self.need_appearances));

        if let Some(sig_flags) = self.sig_flags {
            dict.set("SigFlags", Object::Integer(sig_flags as i64));
        }
        if !self.co.is_empty() {
            let co_refs: Vec<Object> = self.co.iter().map(|r| Object::Reference(*r)).collect();
            dict.set("CO", Object::Array(co_refs));
        }
        if let Some(ref da) = self.da {
            dict.set("DA", Object::String(da.clone()));
        }

        dict
    }
}

/// Owns every field built for one document and hands out object ids
#[derive(Debug, Clone)]
pub struct FormManager {
    fields: Vec<(ObjectReference, FormField)>,
    by_id: HashMap<ObjectReference, usize>,
    radio_groups: HashMap<String, ObjectReference>,
    acro_form: AcroForm,
    next_object: u32,
}

impl Default for FormManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormManager {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            by_id: HashMap::new(),
            radio_groups: HashMap::new(),
            acro_form: AcroForm::new(),
            next_object: 1,
        }
    }

    fn allocate(&mut self) -> ObjectReference {
        let id = ObjectReference::new(self.next_object, 0);
        self.next_object += 1;
        id
    }

    /// Register a field with its single widget
    pub fn add_field(&mut self, field_dict: Dictionary, widget: Widget) -> ObjectReference {
        let field_ref = self.allocate();
        self.by_id.insert(field_ref, self.fields.len());
        self.fields.push((field_ref, FormField::new(field_dict)));
        self.acro_form.add_field(field_ref);
        self.attach_widget(field_ref, widget);
        field_ref
    }

    /// Add one radio widget, creating the group on first use
    pub fn add_radio_member(
        &mut self,
        name: &str,
        field_dict: Dictionary,
        widget: Widget,
    ) -> ObjectReference {
        let selected = widget.selected.then(|| widget.on_state.clone()).flatten();
        let field_ref = match self.radio_groups.get(name) {
            Some(group) => {
                let group = *group;
                self.attach_widget(group, widget);
                group
            }
            None => {
                let group = self.add_field(field_dict, widget);
                self.radio_groups.insert(name.to_string(), group);
                group
            }
        };
        if let (Some(state), Some(field)) = (selected, self.field_mut(field_ref)) {
            field.field_dict.set("V", Object::name(state));
        }
        field_ref
    }

    fn attach_widget(&mut self, field_ref: ObjectReference, mut widget: Widget) {
        widget.id = Some(self.allocate());
        widget.parent = Some(field_ref);
        if let Some(field) = self.field_mut(field_ref) {
            field.add_widget(widget);
        }
    }

    pub fn field(&self, field_ref: ObjectReference) -> Option<&FormField> {
        self.by_id.get(&field_ref).map(|&i| &self.fields[i].1)
    }

    pub fn field_mut(&mut self, field_ref: ObjectReference) -> Option<&mut FormField> {
        let index = *self.by_id.get(&field_ref)?;
        Some(&mut self.fields[index].1)
    }

    pub fn get_field(&self, name: &str) -> Option<&FormField> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| field.name() == Some(name))
    }

    /// Fields in creation order
    pub fn fields(&self) -> impl Iterator<Item = (ObjectReference, &FormField)> {
        self.fields.iter().map(|(id, field)| (*id, field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bind a JavaScript action to a field event; calculations join the calculation order
    pub fn add_script(
        &mut self,
        field_ref: ObjectReference,
        trigger: ScriptTrigger,
        action: Dictionary,
    ) -> bool {
        let Some(field) = self.field_mut(field_ref) else {
            return false;
        };
        field
            .field_dict
            .dict_entry("AA")
            .set(trigger.aa_key(), action);
        if trigger == ScriptTrigger::Calculate && !self.acro_form.co.contains(&field_ref) {
            self.acro_form.co.push(field_ref);
        }
        true
    }

    /// Record that the document holds signature fields
    pub fn mark_signatures(&mut self) {
        self.acro_form.sig_flags = Some(1);
    }

    pub fn get_acro_form(&self) -> &AcroForm {
        &self.acro_form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::geometry::Rectangle;

    fn widget() -> Widget {
        Widget::new(Rectangle::new(10.0, 10.0, 12.0, 12.0))
    }

    fn named(name: &str) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("T", name);
        dict
    }

    #[test]
    fn test_acro_form_defaults() {
        let dict = AcroForm::new().to_dict();
        assert_eq!(dict.get("Fields"), Some(&Object::Array(vec![])));
        assert_eq!(dict.get("NeedAppearances"), Some(&Object::Boolean(true)));
        assert_eq!(
            dict.get("DA"),
            Some(&Object::String("/Helv 12 Tf 0 g".to_string()))
        );
        assert!(dict.get("CO").is_none());
        assert!(dict.get("SigFlags").is_none());
    }

    #[test]
    fn test_add_field_assigns_ids() {
        let mut manager = FormManager::new();
        let a = manager.add_field(named("a"), widget());
        let b = manager.add_field(named("b"), widget());
        assert_ne!(a, b);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get_acro_form().fields, vec![a, b]);

        let field = manager.field(a).unwrap();
        assert_eq!(field.widgets.len(), 1);
        assert_eq!(field.widgets[0].parent, Some(a));
        assert!(field.widgets[0].id.is_some());
        assert_eq!(manager.get_field("b").map(|f| f.widgets.len()), Some(1));
    }

    #[test]
    fn test_radio_members_share_a_field() {
        let mut manager = FormManager::new();
        let small = manager.add_radio_member(
            "size",
            named("size"),
            widget().with_on_state("Small", false),
        );
        let large = manager.add_radio_member(
            "size",
            named("size"),
            widget().with_on_state("Large", true),
        );
        assert_eq!(small, large);
        assert_eq!(manager.len(), 1);

        let group = manager.field(small).unwrap();
        assert_eq!(group.widgets.len(), 2);
        assert_eq!(group.field_dict.get("V"), Some(&Object::name("Large")));
        assert_eq!(manager.get_acro_form().fields.len(), 1);
    }

    #[test]
    fn test_calculate_script_joins_calculation_order() {
        let mut manager = FormManager::new();
        let total = manager.add_field(named("total"), widget());
        let action = Action::javascript("event.value = (a + b);").to_dict();
        assert!(manager.add_script(total, ScriptTrigger::Calculate, action.clone()));
        assert!(manager.add_script(total, ScriptTrigger::Calculate, action));

        assert_eq!(manager.get_acro_form().co, vec![total]);
        let aa = manager.field(total).unwrap().field_dict.get_dict("AA").unwrap();
        assert!(aa.get("C").is_some());
    }

    #[test]
    fn test_script_on_unknown_field() {
        let mut manager = FormManager::new();
        let missing = ObjectReference::new(99, 0);
        assert!(!manager.add_script(missing, ScriptTrigger::Format, Dictionary::new()));
    }

    #[test]
    fn test_signature_flags() {
        let mut manager = FormManager::new();
        manager.mark_signatures();
        assert_eq!(
            manager.get_acro_form().to_dict().get("SigFlags"),
            Some(&Object::Integer(1))
        );
    }
}
