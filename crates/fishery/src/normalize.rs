use crate::{
    record::{FishEntry, FishingRecord, RawFishEntry, RawRecord, UNSPECIFIED, UNSPECIFIED_NAME},
    species::SpeciesIndex,
    users::UserDirectory,
};

/// Turn a stored record into the shape the dashboard renders.
///
/// Fisher fields come from the directory, the place of the catch from the
/// record's own location fields, and every fish entry is looked up in the
/// species index under its exact name. Totals are always recomputed.
pub fn normalize(raw: &RawRecord, species: &SpeciesIndex, users: &UserDirectory) -> FishingRecord {
    let profile = raw.user_id.as_deref().and_then(|id| users.get(id));

    let fisher_name = profile
        .map(|p| p.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNSPECIFIED_NAME)
        .to_string();
    let or_unspecified = |value: Option<&String>| {
        value
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(UNSPECIFIED)
            .to_string()
    };
    let fisher_photo = profile
        .and_then(|p| p.fisher_profile.as_ref())
        .and_then(|fp| fp.get("photo"))
        .and_then(|photo| photo.as_str())
        .map(str::to_string);

    FishingRecord {
        id: raw.id.clone(),
        user_id: raw.user_id.clone(),
        fisher_name,
        fisher_phone: or_unspecified(profile.and_then(|p| p.phone.as_ref())),
        fisher_village: or_unspecified(profile.and_then(|p| p.village.as_ref())),
        fisher_photo,
        catch_date: raw.catch_date,
        location: raw.location.resolve(),
        fish_list: raw
            .fish
            .entries()
            .iter()
            .map(|entry| fish_entry(entry, species))
            .collect(),
        total_weight: raw.total_weight,
        total_value: raw.total_value(),
        weather: raw.weather.clone(),
        water_level: raw.water_level.clone(),
        fishing_gear: raw.fishing_gear.clone(),
        notes: raw.notes.clone(),
        photos: raw.photos.clone(),
        verified: raw.verified,
        is_paid: raw.is_paid,
        payment_id: raw.payment_id.clone(),
        payment_date: raw.payment_date,
        payment_amount: raw.payment_amount,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

fn fish_entry(entry: &RawFishEntry, species: &SpeciesIndex) -> FishEntry {
    FishEntry {
        name: entry.name.clone(),
        local_name: species.local_name(&entry.name).map(str::to_string),
        count: entry.count,
        weight: entry.weight,
        price: entry.price,
        min_length: entry.min_length,
        max_length: entry.max_length,
        total_value: entry.total_value(),
        photo: entry.photo.clone(),
    }
}
