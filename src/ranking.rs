use chrono::{Datelike, NaiveDateTime};

use crate::hours;
use crate::models::{Business, Coordinates, MapMarker, MapView, RankedBusiness};

pub const MAP_ZOOM: u8 = 12;

/// Drops permanently closed businesses and orders the rest by rating, best
/// first. Equal ratings keep their input order.
pub fn rank_businesses(businesses: Vec<Business>) -> Vec<Business> {
    let mut ranked: Vec<Business> = businesses.into_iter().filter(|b| !b.is_closed).collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked
}

/// Resolves status and display fields for an already ranked list.
pub fn annotate(ranked: Vec<Business>, now: NaiveDateTime) -> Vec<RankedBusiness> {
    let weekday = now.weekday().num_days_from_monday();
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, business)| {
            let status = hours::resolve_status(business.hours_schedule.as_ref(), now);
            RankedBusiness {
                rank: i + 1,
                status_label: status.label(),
                todays_hours: hours::todays_hours(business.hours_schedule.as_ref(), weekday),
                status,
                address: business
                    .display_address
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "N/A".to_string()),
                price: business.price.unwrap_or_else(|| "N/A".to_string()),
                id: business.id,
                name: business.name,
                rating: business.rating,
                url: business.url,
                image_url: business.image_url,
                coordinates: business.coordinates,
            }
        })
        .collect()
}

/// Map centred on the mean position of every result that has coordinates.
pub fn map_view(results: &[RankedBusiness]) -> Option<MapView> {
    let markers: Vec<MapMarker> = results
        .iter()
        .filter_map(|r| {
            r.coordinates.map(|c| MapMarker {
                latitude: c.latitude,
                longitude: c.longitude,
                tooltip: format!("#{}: {}", r.rank, r.name),
            })
        })
        .collect();

    if markers.is_empty() {
        return None;
    }

    let count = markers.len() as f64;
    let center = Coordinates {
        latitude: markers.iter().map(|m| m.latitude).sum::<f64>() / count,
        longitude: markers.iter().map(|m| m.longitude).sum::<f64>() / count,
    };

    Some(MapView {
        center,
        zoom: MAP_ZOOM,
        markers,
    })
}
