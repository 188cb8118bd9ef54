use bluesky_core::{Alert, DashboardView, IconCategory, LocationView};
use chrono::Local;

/// Formats the whole dashboard: alert banner, location cards and status footer.
pub fn dashboard(view: &DashboardView) -> String {
    let mut output = String::from("UK Blue Sky Alerts\n==================\n\n");

    if !view.alerts.is_empty() {
        output.push_str(&alerts(&view.alerts));
        output.push('\n');
    }

    if view.locations.is_empty() {
        output.push_str("No locations tracked.\n\n");
    }
    for card in &view.locations {
        output.push_str(&location_card(card));
        output.push('\n');
    }

    output.push_str(&footer(view));
    output
}

pub fn alerts(alerts: &[Alert]) -> String {
    let mut output = String::from("Blue Sky Alert!\n");
    for alert in alerts {
        output.push_str(&format!(
            "  \u{2600} Beautiful conditions in {}!\n    {}\u{00b0}C \u{2022} {}% cloud cover\n",
            alert.location_name, alert.temperature_c, alert.cloud_cover_pct
        ));
    }
    output
}

pub fn location_card(card: &LocationView) -> String {
    let mut output = format!("[{}] {}\n", card.location.id, card.location.name);

    match card.snapshot {
        Some(snapshot) => {
            let info = snapshot.info();
            output.push_str(&format!(
                "  {} {}\u{00b0}C  {}\n  Cloud cover: {}%",
                icon(info.icon),
                snapshot.temperature_c,
                info.description,
                snapshot.cloud_cover_pct
            ));
            if snapshot.is_blue_sky {
                output.push_str("  [Blue Sky Day!]");
            }
            output.push('\n');
        }
        None => output.push_str("  No data yet\n"),
    }

    output
}

fn footer(view: &DashboardView) -> String {
    let updated = view
        .last_polled_at
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    if view.busy {
        format!("Last updated: {updated} (refreshing...)\n")
    } else {
        format!("Last updated: {updated}\n")
    }
}

fn icon(category: IconCategory) -> &'static str {
    match category {
        IconCategory::Sun => "\u{2600}",
        IconCategory::Cloud => "\u{2601}",
        IconCategory::CloudRain => "\u{2614}",
    }
}
