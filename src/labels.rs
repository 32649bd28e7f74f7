//! Static display-name lookup tables for causes, effects, and routes,
//! plus the fallback chain that turns raw GTFS alert codes into
//! dashboard labels.

/// Rail route type codes and their display names.
/// 0 = Light Rail (Green Line), 1 = Subway, 2 = Commuter Rail; any other
/// code is filtered out upstream.
pub static ROUTE_TYPE_NAMES: &[(&str, &str)] = &[
    ("0", "Green Line"),
    ("1", "Subway"),
    ("2", "Commuter Rail"),
];

/// Fallback color when a route id has no entry in [`ROUTE_COLORS`].
pub const DEFAULT_ROUTE_COLOR: &str = "#80276C";

// MBTA official colors
pub static ROUTE_COLORS: &[(&str, &str)] = &[
    ("Red", "#DA291C"),
    ("Orange", "#ED8B00"),
    ("Blue", "#003DA5"),
    ("Green-B", "#00843D"),
    ("Green-C", "#00843D"),
    ("Green-D", "#00843D"),
    ("Green-E", "#00843D"),
    ("Mattapan", "#DA291C"),
    ("CR-Worcester", "#80276C"),
    ("CR-Fitchburg", "#80276C"),
    ("CR-Franklin", "#80276C"),
    ("CR-Providence", "#80276C"),
    ("CR-Newburyport", "#80276C"),
    ("CR-NewBedford", "#80276C"),
    ("CR-Haverhill", "#80276C"),
    ("CR-Lowell", "#80276C"),
    ("CR-Kingston", "#80276C"),
    ("CR-Greenbush", "#80276C"),
    ("CR-Fairmount", "#80276C"),
    ("CR-Needham", "#80276C"),
    ("CR-Middleborough", "#80276C"),
    ("CR-Foxboro", "#80276C"),
];

pub static ROUTE_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Red", "Red Line"),
    ("Orange", "Orange Line"),
    ("Blue", "Blue Line"),
    ("Green-B", "Green Line B"),
    ("Green-C", "Green Line C"),
    ("Green-D", "Green Line D"),
    ("Green-E", "Green Line E"),
    ("Mattapan", "Mattapan Trolley"),
    ("CR-Worcester", "Worcester Line"),
    ("CR-Fitchburg", "Fitchburg Line"),
    ("CR-Franklin", "Franklin/Foxboro Line"),
    ("CR-Providence", "Providence/Stoughton Line"),
    ("CR-Newburyport", "Newburyport/Rockport Line"),
    ("CR-NewBedford", "New Bedford Line"),
    ("CR-Haverhill", "Haverhill Line"),
    ("CR-Lowell", "Lowell Line"),
    ("CR-Kingston", "Kingston Line"),
    ("CR-Greenbush", "Greenbush Line"),
    ("CR-Fairmount", "Fairmount Line"),
    ("CR-Needham", "Needham Line"),
    ("CR-Middleborough", "Middleborough Line"),
    ("CR-Foxboro", "Foxboro Line"),
];

// cause_detail -> display name (preferred over the generic cause field)
static CAUSE_DETAIL_DISPLAY: &[(&str, &str)] = &[
    ("DISABLED_TRAIN", "Disabled Train"),
    ("SIGNAL_PROBLEM", "Signal Problem"),
    ("SIGNAL_ISSUE", "Signal Problem"),
    ("MAINTENANCE", "Maintenance"),
    ("POLICE_ACTION", "Police Activity"),
    ("POLICE_ACTIVITY", "Police Activity"),
    ("MEDICAL_EMERGENCY", "Medical Emergency"),
    ("SWITCH_PROBLEM", "Switch Problem"),
    ("POWER_PROBLEM", "Power Problem"),
    ("ACCIDENT", "Accident"),
    ("FIRE_DEPARTMENT_ACTIVITY", "Fire Dept Activity"),
    ("TRACK_PROBLEM", "Track Problem"),
    ("SINGLE_TRACKING", "Single Tracking"),
    ("TRACK_WORK", "Track Work"),
    ("CONSTRUCTION", "Construction"),
    ("SNOW", "Weather"),
    ("SLIPPERY_RAIL", "Weather"),
    ("WEATHER", "Weather"),
    ("FLOODING", "Weather"),
    ("TRAFFIC", "Traffic"),
    ("FIRE", "Fire"),
    ("HEAVY_RIDERSHIP", "Heavy Ridership"),
    ("SPECIAL_EVENT", "Special Event"),
    ("HOLIDAY", "Special Event"),
    ("MECHANICAL_ISSUE", "Mechanical Issue"),
    ("SPEED_RESTRICTION", "Speed Restriction"),
    ("UNKNOWN_CAUSE", "Unknown"),
];

// Fallback: generic cause field -> display name
static CAUSE_DISPLAY: &[(&str, &str)] = &[
    ("CONSTRUCTION", "Construction"),
    ("MAINTENANCE", "Maintenance"),
    ("UNKNOWN_CAUSE", "Unknown"),
    ("OTHER_CAUSE", "Other"),
    ("TECHNICAL_PROBLEM", "Technical Problem"),
    ("POLICE_ACTIVITY", "Police Activity"),
    ("ACCIDENT", "Accident"),
    ("WEATHER", "Weather"),
    ("MEDICAL_EMERGENCY", "Medical Emergency"),
    ("STRIKE", "Strike"),
    ("DEMONSTRATION", "Demonstration"),
    ("FIRE", "Fire"),
    ("FLOOD", "Weather"),
    ("POWER_PROBLEM", "Power Problem"),
    ("SPECIAL_EVENT", "Special Event"),
    ("TRAFFIC", "Traffic"),
];

// effect_detail -> display name (preferred over the generic effect field)
static EFFECT_DETAIL_DISPLAY: &[(&str, &str)] = &[
    ("DELAY", "Delay"),
    ("TRACK_CHANGE", "Track Change"),
    ("CANCELLATION", "Cancellation"),
    ("SERVICE_CHANGE", "Service Change"),
    ("SHUTTLE", "Shuttle"),
    ("ESCALATOR_CLOSURE", "Escalator Closure"),
    ("ELEVATOR_CLOSURE", "Elevator Closure"),
    ("SUSPENSION", "Suspension"),
    ("SCHEDULE_CHANGE", "Schedule Change"),
    ("STATION_ISSUE", "Station Issue"),
    ("STATION_CLOSURE", "Station Closure"),
    ("EXTRA_SERVICE", "Extra Service"),
];

// Fallback: generic effect field -> display name
static EFFECT_DISPLAY: &[(&str, &str)] = &[
    ("DETOUR", "Detour"),
    ("ACCESSIBILITY_ISSUE", "Accessibility Issue"),
    ("OTHER_EFFECT", "Other"),
    ("STOP_MOVED", "Stop Moved"),
    ("UNKNOWN_EFFECT", "Unknown"),
    ("SIGNIFICANT_DELAYS", "Significant Delays"),
    ("NO_SERVICE", "No Service"),
    ("MODIFIED_SERVICE", "Modified Service"),
    ("ADDITIONAL_SERVICE", "Additional Service"),
    ("REDUCED_SERVICE", "Reduced Service"),
    ("SHUTTLE", "Shuttle"),
    ("STOP_CLOSURE", "Stop Closure"),
    ("STATION_CLOSURE", "Station Closure"),
    ("DELAY", "Delay"),
    ("SUSPENSION", "Suspension"),
    ("SERVICE_CHANGE", "Service Change"),
    ("SNOW_ROUTE", "Snow Route"),
    ("TRACK_CHANGE", "Track Change"),
    ("SCHEDULE_CHANGE", "Schedule Change"),
    ("CANCELLATION", "Cancellation"),
    ("EXTRA_SERVICE", "Extra Service"),
    ("STATION_ISSUE", "Station Issue"),
    ("BIKE_ISSUE", "Bike Issue"),
    ("PARKING_ISSUE", "Parking Issue"),
    ("DOCK_ISSUE", "Dock Issue"),
    ("ELEVATOR_CLOSURE", "Elevator Closure"),
    ("ESCALATOR_CLOSURE", "Escalator Closure"),
    ("POLICY_CHANGE", "Policy Change"),
    ("FARE_CHANGE", "Fare Change"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Turns a raw SCREAMING_SNAKE code into a presentable label:
/// underscores become spaces, each word is title-cased.
fn humanize(code: &str) -> String {
    code.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a display label for an alert cause, preferring the detail code
/// for richer categorization and falling back to the generic code.
pub fn display_cause(cause: &str, cause_detail: &str) -> String {
    // Try the detail field first (unless it's just UNKNOWN_CAUSE echoed back)
    if !cause_detail.is_empty() && cause_detail != "UNKNOWN_CAUSE" {
        if let Some(label) = lookup(CAUSE_DETAIL_DISPLAY, cause_detail) {
            return label.to_string();
        }
    }
    if let Some(label) = lookup(CAUSE_DISPLAY, cause) {
        return label.to_string();
    }
    if cause.is_empty() {
        "Unknown".to_string()
    } else {
        humanize(cause)
    }
}

/// Resolves a display label for an alert effect, same fallback chain as
/// [`display_cause`].
pub fn display_effect(effect: &str, effect_detail: &str) -> String {
    if !effect_detail.is_empty() {
        if let Some(label) = lookup(EFFECT_DETAIL_DISPLAY, effect_detail) {
            return label.to_string();
        }
    }
    if let Some(label) = lookup(EFFECT_DISPLAY, effect) {
        return label.to_string();
    }
    if effect.is_empty() {
        "Unknown".to_string()
    } else {
        humanize(effect)
    }
}

/// Maps a route type code ("0"/"1"/"2") to its display name.
pub fn route_type_name(code: &str) -> Option<&'static str> {
    lookup(ROUTE_TYPE_NAMES, code)
}

pub fn route_color(route_id: &str) -> &'static str {
    lookup(ROUTE_COLORS, route_id).unwrap_or(DEFAULT_ROUTE_COLOR)
}

pub fn route_display_name(route_id: &str) -> String {
    lookup(ROUTE_DISPLAY_NAMES, route_id)
        .map(str::to_string)
        .unwrap_or_else(|| route_id.to_string())
}

/// Returns true when the route id has an entry in the color table, i.e. it
/// is one of the known rail routes worth requesting a shape for.
pub fn is_known_route(route_id: &str) -> bool {
    lookup(ROUTE_COLORS, route_id).is_some()
}

/// Infers the route type label from a route id's naming convention.
pub fn route_type_for_route(route_id: &str) -> &'static str {
    if route_id.starts_with("CR-") {
        "Commuter Rail"
    } else if route_id.starts_with("Green-") || route_id == "Mattapan" {
        "Green Line"
    } else {
        "Subway"
    }
}
