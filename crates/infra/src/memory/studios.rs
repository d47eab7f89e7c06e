use std::collections::HashMap;
use std::sync::RwLock;

use studiobill_core::{DomainError, DomainResult, Money, StudioId};
use studiobill_studios::{Studio, StudioDirectory};

use super::poisoned;

/// In-memory studio directory.
#[derive(Debug, Default)]
pub struct InMemoryStudioStore {
    studios: RwLock<HashMap<StudioId, Studio>>,
}

impl InMemoryStudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, studio: Studio) -> DomainResult<()> {
        let mut studios = self.studios.write().map_err(|_| poisoned())?;
        studios.insert(studio.id, studio);
        Ok(())
    }

    pub fn set_hourly_rate(&self, id: StudioId, rate: Money) -> DomainResult<Studio> {
        let mut studios = self.studios.write().map_err(|_| poisoned())?;
        let studio = studios.get_mut(&id).ok_or_else(DomainError::not_found)?;
        studio.set_hourly_rate(rate)?;
        Ok(studio.clone())
    }

    pub fn deactivate(&self, id: StudioId) -> DomainResult<()> {
        let mut studios = self.studios.write().map_err(|_| poisoned())?;
        let studio = studios.get_mut(&id).ok_or_else(DomainError::not_found)?;
        studio.deactivate();
        Ok(())
    }
}

impl StudioDirectory for InMemoryStudioStore {
    fn active_studios(&self) -> DomainResult<Vec<Studio>> {
        let studios = self.studios.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = studios.values().filter(|s| s.active).cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    fn get(&self, id: StudioId) -> DomainResult<Option<Studio>> {
        let studios = self.studios.read().map_err(|_| poisoned())?;
        Ok(studios.get(&id).cloned())
    }

    fn hourly_rate(&self, id: StudioId) -> DomainResult<Money> {
        let studios = self.studios.read().map_err(|_| poisoned())?;
        studios
            .get(&id)
            .map(|s| s.hourly_rate)
            .ok_or_else(DomainError::not_found)
    }
}
