/// Display label for a season given by its starting year: "2023" -> "2023/24".
///
/// Empty input gives an empty label; anything that is not an integer is read
/// as year 0.
pub fn season_label(season: &str) -> String {
    if season.is_empty() {
        return String::new();
    }
    let start_year = season.parse::<i64>().unwrap_or(0);
    let end_year = start_year.saturating_add(1);
    format!("{start_year}/{:02}", end_year % 100)
}
