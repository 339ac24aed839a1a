use std::collections::HashMap;

use database::entities::{fish_species, prelude::*};
use log::debug;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::Result;

/// Species metadata keyed by every display name a record may use.
#[derive(Debug, Clone, Default)]
pub struct SpeciesIndex {
    by_name: HashMap<String, fish_species::Model>,
}

impl SpeciesIndex {
    /// Index each species under its common name and, when it differs, its
    /// local name. The first species to claim a name keeps it.
    pub fn build(species: impl IntoIterator<Item = fish_species::Model>) -> Self {
        let mut by_name = HashMap::new();

        for species in species {
            if let Some(local) = species.local_name.clone() {
                if local != species.common_name {
                    by_name.entry(local).or_insert_with(|| species.clone());
                }
            }
            by_name
                .entry(species.common_name.clone())
                .or_insert(species);
        }

        Self { by_name }
    }

    pub async fn fetch(db: &DatabaseConnection) -> Result<Self> {
        Ok(Self::build(list_species(db).await?))
    }

    pub fn get(&self, name: &str) -> Option<&fish_species::Model> {
        self.by_name.get(name)
    }

    pub fn local_name(&self, name: &str) -> Option<&str> {
        self.get(name)?.local_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// All reference species ordered by common name.
pub async fn list_species(db: &DatabaseConnection) -> Result<Vec<fish_species::Model>> {
    debug!("Querying fish species");
    Ok(FishSpecies::find()
        .order_by_asc(fish_species::Column::CommonName)
        .all(db)
        .await?)
}
