use std::collections::{BTreeSet, HashMap};

use database::entities::{prelude::*, users};
use futures::future::join_all;
use log::{debug, warn};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Profiles looked up for one request.
///
/// An ID maps to `None` when the profile does not exist or could not be
/// read; both cases render as placeholders.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    profiles: HashMap<String, Option<users::Model>>,
}

impl UserDirectory {
    /// Fetch every distinct profile once, all lookups in flight together.
    ///
    /// A failed lookup is logged and treated as a missing profile.
    pub async fn fetch<'a>(
        db: &DatabaseConnection,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let ids: BTreeSet<&str> = ids.into_iter().filter(|id| !id.is_empty()).collect();
        debug!("Querying {} user profiles", ids.len());

        let lookups = ids.into_iter().map(|id| async move {
            let profile = match Users::find_by_id(id.to_string()).one(db).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("Could not fetch user profile {id}: {err}");
                    None
                }
            };
            (id.to_string(), profile)
        });

        Self {
            profiles: join_all(lookups).await.into_iter().collect(),
        }
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = users::Model>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id.clone(), Some(profile)))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&users::Model> {
        self.profiles.get(id)?.as_ref()
    }

    /// Number of distinct IDs that were looked up.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
