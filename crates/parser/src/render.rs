//! Chat-ready summaries of works and series.

use crate::entity::Entity;
use abstractor_extract::models::{Series, Site, Work};
use std::collections::HashSet;

const LOCK: &str = ":lock:";
const ELLIPSIS: &str = "…";
const MAX_SERIES_LINES: usize = 2;
const MAX_FANDOMS: usize = 5;
const MAX_RELATIONSHIPS: usize = 3;
const MAX_CHARACTERS: usize = 3;
const MAX_TAGS: usize = 5;
const MAX_LISTED_MEMBERS: usize = 3;

pub fn render(entity: &Entity) -> String {
    match entity {
        Entity::Work(work) => render_work(work),
        Entity::Series(series) => render_series(&series.series),
    }
}

pub fn render_work(work: &Work) -> String {
    let site = work.site();
    let mut lines = Vec::new();
    lines.push(format!(
        "{}**{}** (<{}>) by **{}**",
        if work.restricted { LOCK } else { "" },
        work.title,
        work.url,
        usernames(work.authors.iter().map(|author| author.username.as_str())),
    ));
    for series in work.series.iter().take(MAX_SERIES_LINES) {
        lines.push(format!(
            "**Part {}** of the **{}** series (<{}>)",
            series.position,
            series.name,
            series.url()
        ));
    }
    if !work.fandoms.is_empty() {
        let fandoms: Vec<&str> = work.fandoms.iter().map(|fandom| fandom.name.as_str()).collect();
        lines.push(format!("**Fandoms:** {}", capped(&fandoms, MAX_FANDOMS)));
    }
    if let Some(rating) = work.rating {
        let rating = if site == Site::Ao3 { rating.as_str() } else { rating.as_short_str() };
        if work.categories.is_empty() {
            lines.push(format!("**Rating:** {rating}"));
        } else {
            let separator = if site == Site::Ao3 { ", " } else { "/" };
            lines.push(format!(
                "**Rating:** {rating}          **{}:** {}",
                site.category_label(),
                work.categories.join(separator)
            ));
        }
    }
    if site.has_warnings() {
        let warnings: Vec<&str> = work.warnings.iter().map(|warning| warning.as_str()).collect();
        lines.push(format!("**Warnings:** {}", warnings.join(", ")));
    }
    let relationships: Vec<&str> = work.relationships().collect();
    if !relationships.is_empty() {
        lines.push(format!("**Relationships:** {}", capped(&relationships, MAX_RELATIONSHIPS)));
    }
    let characters = unlisted_characters(work, &relationships);
    if !characters.is_empty() {
        let label = if relationships.is_empty() { "Characters" } else { "Additional Characters" };
        lines.push(format!("**{label}:** {}", capped(&characters, MAX_CHARACTERS)));
    }
    let tags: Vec<&str> = work.freeform().collect();
    if !tags.is_empty() {
        lines.push(format!("**Tags:** {}", capped(&tags, MAX_TAGS)));
    }
    if !work.summary.is_empty() {
        lines.push(format!("**Summary:** {}", work.summary));
    }
    let mut stats = format!("**Words:** {} **Chapters:** {}", work.words, work.chapters);
    if let Some(label) = site.kudos_label() {
        stats.push_str(&format!(" **{label}:** {}", work.kudos));
    }
    stats.push_str(&format!(" **Updated:** {}", work.updated));
    lines.push(stats);
    lines.join("\n")
}

pub fn render_series(series: &Series) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{}**{}** (<{}>) by **{}**",
        if series.restricted { LOCK } else { "" },
        series.name,
        series.url(),
        usernames(series.authors.iter().map(|author| author.username.as_str())),
    ));
    if !series.description.is_empty() {
        lines.push(format!("**Description:** {}", series.description));
    }
    lines.push(format!("**Begun:** {} **Updated:** {}", series.begun, series.updated));
    lines.push(format!(
        "**Words:** {} **Works:** {} **Complete:** {}",
        series.words,
        series.work_count,
        if series.complete { "Yes" } else { "No" }
    ));
    lines.push(String::new());
    let listed = if series.works.len() == MAX_LISTED_MEMBERS + 1 {
        series.works.len()
    } else {
        MAX_LISTED_MEMBERS
    };
    for (index, work) in series.works.iter().take(listed).enumerate() {
        lines.push(format!("{}. __{}__: <{}>", index + 1, work.title, work.url()));
    }
    if series.works.len() > MAX_LISTED_MEMBERS + 1 {
        let remaining = (series.work_count as usize).saturating_sub(MAX_LISTED_MEMBERS);
        lines.push(format!("        [and {remaining} more works]"));
    }
    lines.join("\n")
}

fn usernames<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// The first `max` items joined by `, `, with a trailing `, …` if any were
/// left out.
fn capped(items: &[&str], max: usize) -> String {
    let joined = items.iter().take(max).copied().collect::<Vec<_>>().join(", ");
    if items.len() > max { format!("{joined}, {ELLIPSIS}") } else { joined }
}

/// Characters not already named by one of the rendered relationships.
fn unlisted_characters<'w>(work: &'w Work, relationships: &[&str]) -> Vec<&'w str> {
    let implied: HashSet<&str> = relationships
        .iter()
        .take(MAX_RELATIONSHIPS)
        .flat_map(|relationship| relationship.split(['/', '&']))
        .map(|name| base_name(name.trim()))
        .collect();
    work.characters()
        .filter(|character| {
            let name = base_name(character);
            let name = name.split(" - ").next().unwrap_or(name).trim();
            !implied.contains(name)
        })
        .collect()
}

/// Drops a trailing parenthetical qualifier: `Kara Danvers (Supergirl)` → `Kara Danvers`.
fn base_name(name: &str) -> &str {
    name.split(" (").next().unwrap_or(name).trim()
}
