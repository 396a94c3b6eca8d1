//! Human-readable rendering of plans.

use std::fmt::Write;

use crate::service::TripResponse;

/// Decimal hours as `"Xh Ymin"`, or `"Ymin"` under one hour.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    if h == 0 {
        format!("{m}min")
    } else {
        format!("{h}h {m}min")
    }
}

/// Multi-line itinerary for terminal output.
pub fn render_itinerary(response: &TripResponse) -> String {
    let trip = &response.trip;
    let mut out = String::new();

    let _ = writeln!(out, "Vehicle: {}", response.vehicle.display_name());
    let _ = writeln!(
        out,
        "Range: {} km, usable {:.1} km (reserve {:.1} km)",
        response.vehicle.range_km, trip.usable_range_km, trip.safety_margin_km
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Start: {} {}", response.start.city, response.start.location);

    for stop in &trip.stops {
        let marker = if stop.found { "" } else { " [!]" };
        let _ = writeln!(out, "  Stop {}{}: {}", stop.stop_number, marker, stop.name);
        let _ = writeln!(out, "      {}", stop.address);
        if let Some(city) = &stop.city {
            let _ = writeln!(out, "      {city}");
        }
        let _ = writeln!(
            out,
            "      {} | {} min | {}",
            stop.power, stop.charging_time_minutes, stop.location
        );
    }

    let _ = writeln!(out, "End:   {} {}", response.end.city, response.end.location);
    let _ = writeln!(out);
    let _ = writeln!(out, "Distance: {:.2} km", trip.total_distance_km);
    let _ = writeln!(out, "Charging stops: {}", trip.num_stops);
    let _ = writeln!(out, "Driving:  {}", format_hours(trip.driving_time_h));
    let _ = writeln!(out, "Charging: {}", format_hours(trip.charging_time_h));
    let _ = writeln!(out, "Total:    {}", format_hours(trip.total_time_h));

    let missing = trip.placeholder_stops().count();
    if missing > 0 {
        let _ = writeln!(out, "Warning: {missing} stop(s) have no charging station nearby");
    }
    if trip.route_coords.is_none() {
        let _ = writeln!(out, "Warning: road route unavailable, distances are estimates");
    }

    out
}
