//! Team page schema: heading plus the roster table.
//!
//! Parsing is best effort. A missing heading gives an empty team name and a
//! missing or short table gives empty rosters; nothing here returns an error.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Zero-based roster column holding the gender text. Positional: the table
/// header is only checked to emit a warning, never to relocate the column.
pub const GENDER_COLUMN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player {
    pub name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Exact cell text the site uses; compared case-sensitively, untrimmed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// One team's parsed roster. `team_name` becomes the index key and is not
/// repeated in the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    #[serde(skip)]
    pub team_name: String,
    pub players: Vec<Player>,
    pub male_players: Vec<Player>,
    pub female_players: Vec<Player>,
}

pub fn parse_team(html: &str) -> Roster {
    let document = Html::parse_document(html);
    let team_name = team_name(&document);
    let rows = roster_rows(&document);

    Roster {
        players: players_from_rows(&rows, None),
        male_players: players_from_rows(&rows, Some(Gender::Male)),
        female_players: players_from_rows(&rows, Some(Gender::Female)),
        team_name,
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn team_name(document: &Html) -> String {
    let heading = selector("div.teams > h2")
        .and_then(|sel| document.select(&sel).next().map(|h2| h2.text().collect::<String>()));

    match heading {
        Some(name) => name,
        None => {
            log::warn!("Team page has no heading, using an empty team name");
            String::new()
        }
    }
}

/// Data rows of the first `table.list`: every row except the first (header)
/// and the last (footer).
fn roster_rows(document: &Html) -> Vec<ElementRef<'_>> {
    let Some(table) = selector("table.list").and_then(|sel| document.select(&sel).next()) else {
        log::warn!("Team page has no roster table");
        return Vec::new();
    };

    let rows = table_rows(table);
    if let Some(header) = rows.first() {
        check_gender_heading(*header);
    }

    if rows.len() < 2 {
        return Vec::new();
    }
    rows[1..rows.len() - 1].to_vec()
}

/// Rows that belong to `table` itself, whether or not the parser wrapped them
/// in `thead`/`tbody`/`tfoot`. Rows of nested tables are not included.
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }

    rows
}

fn cell_text(row: ElementRef<'_>, index: usize) -> Option<String> {
    let cells = selector("td")?;
    row.select(&cells)
        .nth(index)
        .map(|cell| cell.text().collect())
}

fn player_name(row: ElementRef<'_>) -> String {
    let (Some(cells), Some(anchors)) = (selector("td"), selector("a")) else {
        return String::new();
    };

    row.select(&cells)
        .next()
        .map(|cell| {
            cell.select(&anchors)
                .flat_map(|anchor| anchor.text())
                .collect()
        })
        .unwrap_or_default()
}

fn players_from_rows(rows: &[ElementRef<'_>], gender: Option<Gender>) -> Vec<Player> {
    rows.iter()
        .filter(|row| match gender {
            Some(gender) => cell_text(**row, GENDER_COLUMN).as_deref() == Some(gender.as_str()),
            None => true,
        })
        .map(|row| Player::new(player_name(*row)))
        .collect()
}

fn check_gender_heading(header: ElementRef<'_>) {
    let Some(cells) = selector("th, td") else {
        return;
    };

    if let Some(heading) = header.select(&cells).nth(GENDER_COLUMN) {
        let heading: String = heading.text().collect();
        if !heading.trim().eq_ignore_ascii_case("gender") {
            log::warn!(
                "Roster column {} is headed {:?}, gender filters may be wrong",
                GENDER_COLUMN,
                heading.trim()
            );
        }
    }
}
