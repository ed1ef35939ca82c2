use scraper::{Html, Selector};

/// Opaque team identifier assigned by the league site.
pub type TeamId = String;

/// Team identifiers in table row order. Anchors without an `id`, or whose `id`
/// lacks the prefix, are skipped.
pub fn list_team_ids(html: &str, prefix: &str) -> Vec<TeamId> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("tr > td > a.trigger") else {
        return Vec::new();
    };

    let ids: Vec<TeamId> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("id"))
        .filter_map(|id| id.strip_prefix(prefix))
        .map(str::to_string)
        .collect();

    log::debug!("Division page lists {} teams", ids.len());
    ids
}
