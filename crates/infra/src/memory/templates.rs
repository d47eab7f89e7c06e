use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use studiobill_core::{DomainError, DomainResult, TemplateId};
use studiobill_scheduling::{RecurrenceTemplate, TemplateStore};

use super::poisoned;

/// In-memory template store.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<TemplateId, RecurrenceTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, template: RecurrenceTemplate) -> DomainResult<()> {
        let mut templates = self.templates.write().map_err(|_| poisoned())?;
        templates.insert(template.id, template);
        Ok(())
    }

    pub fn get(&self, id: TemplateId) -> DomainResult<Option<RecurrenceTemplate>> {
        let templates = self.templates.read().map_err(|_| poisoned())?;
        Ok(templates.get(&id).cloned())
    }

    /// Flip the auto flag. The caller is expected to follow an enable with a
    /// catch-up pass for this template.
    pub fn set_auto_generate(&self, id: TemplateId, enabled: bool) -> DomainResult<RecurrenceTemplate> {
        let mut templates = self.templates.write().map_err(|_| poisoned())?;
        let template = templates.get_mut(&id).ok_or_else(DomainError::not_found)?;
        template.auto_generate = enabled;
        Ok(template.clone())
    }

    /// Delete a template. Sessions keep their `template_id` back-reference
    /// as a dangling soft reference for audit display.
    pub fn delete(&self, id: TemplateId) -> DomainResult<()> {
        let mut templates = self.templates.write().map_err(|_| poisoned())?;
        templates.remove(&id).ok_or_else(DomainError::not_found)?;
        Ok(())
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn list_active_auto(&self) -> DomainResult<Vec<RecurrenceTemplate>> {
        let templates = self.templates.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = templates
            .values()
            .filter(|t| t.active && t.auto_generate)
            .cloned()
            .collect();
        // Deterministic pass order.
        list.sort_by_key(|t| t.id);
        Ok(list)
    }

    fn update_last_generated(&self, template_id: TemplateId, date: NaiveDate) -> DomainResult<()> {
        let mut templates = self.templates.write().map_err(|_| poisoned())?;
        let template = templates
            .get_mut(&template_id)
            .ok_or_else(DomainError::not_found)?;
        template.last_generated_date = Some(date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use studiobill_core::StudioId;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn template(auto: bool, active: bool) -> RecurrenceTemplate {
        let mut template =
            RecurrenceTemplate::new(StudioId::new(), "Rehearsal", Weekday::Mon, t(9, 0), t(10, 0))
                .unwrap();
        template.auto_generate = auto;
        template.active = active;
        template
    }

    #[test]
    fn lists_only_active_auto_templates() {
        let store = InMemoryTemplateStore::new();
        store.insert(template(true, true)).unwrap();
        store.insert(template(false, true)).unwrap();
        store.insert(template(true, false)).unwrap();

        assert_eq!(store.list_active_auto().unwrap().len(), 1);
    }

    #[test]
    fn update_last_generated_rejects_missing_template() {
        let store = InMemoryTemplateStore::new();
        let err = store
            .update_last_generated(TemplateId::new(), NaiveDate::from_ymd_opt(2025, 3, 17).unwrap())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn set_auto_generate_round_trips() {
        let store = InMemoryTemplateStore::new();
        let template = template(false, true);
        let id = template.id;
        store.insert(template).unwrap();

        let enabled = store.set_auto_generate(id, true).unwrap();
        assert!(enabled.auto_generate);
        assert_eq!(store.list_active_auto().unwrap().len(), 1);
    }
}
