use chrono::{DateTime, TimeZone, Utc};

/// Relative label for a past instant, e.g. "5 minutes ago".
pub fn human_time<Tz: TimeZone>(t: &DateTime<Tz>, now: DateTime<Utc>) -> String {
    let d = now - t.with_timezone(&Utc);
    let secs = d.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        let m = d.num_minutes();
        if m == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", m)
        }
    } else if secs < 86400 {
        let h = d.num_hours();
        if h == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", h)
        }
    } else if secs < 30 * 86400 {
        let days = d.num_days();
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else {
        t.with_timezone(&Utc).format("%b %e, %Y").to_string()
    }
}
