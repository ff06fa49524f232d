//! User counts per country.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::geography::LocationCount;
use crate::models::user::User;
use crate::services::country::iso2_to_iso3;
use crate::store::{Collection, Filter, FindOptions, Store};

/// Count users per ISO3 country, in order of first appearance.
pub async fn user_locations(store: &Store) -> Result<Vec<LocationCount>, AppError> {
    let users: Vec<User> = store
        .find_as(Collection::Users, &Filter::All, &FindOptions::default())
        .await?;
    Ok(count_by_country(&users))
}

pub fn count_by_country(users: &[User]) -> Vec<LocationCount> {
    let mut locations: Vec<LocationCount> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();

    for user in users {
        // Users without a known country are left out, not grouped under an
        // "undefined" key.
        let Some(iso3) = user.country.as_deref().and_then(iso2_to_iso3) else {
            tracing::debug!(user = %user.id, country = ?user.country, "Skipping user without a known country");
            continue;
        };

        match index.get(iso3) {
            Some(&i) => locations[i].value += 1,
            None => {
                index.insert(iso3, locations.len());
                locations.push(LocationCount {
                    id: iso3.to_string(),
                    value: 1,
                });
            }
        }
    }

    locations
}
