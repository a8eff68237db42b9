use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use serde_json::Value;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_OVERVIEW: &str = "No overview available";

pub const PLACEHOLDER_POSTER: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iNTAwIiBoZWlnaHQ9Ijc1MCIgdmlld0JveD0iMCAwIDUwMCA3NTAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSI1MDAiIGhlaWdodD0iNzUwIiBmaWxsPSIjMzc0MTUxIi8+CjxwYXRoIGQ9Ik0yNTAgMzI1QzI3Ni4xIDMyNSAyOTcuNSAzNDYuNCAyOTcuNSAzNzIuNUMyOTcuNSAzOTguNiAyNzYuMSA0MjAgMjUwIDQyMEMyMjMuOSA0MjAgMjAyLjUgMzk4LjYgMjAyLjUgMzcyLjVDMjAyLjUgMzQ2LjQgMjIzLjkgMzI1IDI1MCAzMjVaIiBmaWxsPSIjNkI3Mjg0Ii8+CjxyZWN0IHg9IjE4MCIgeT0iNDMwIiB3aWR0aD0iMTQwIiBoZWlnaHQ9IjIwIiByeD0iMTAiIGZpbGw9IiM2QjcyODQiLz4KPHJlY3QgeD0iMTYwIiB5PSI0NjAiIHdpZHRoPSIxODAiIGhlaWdodD0iMTUiIHJ4PSI3LjUiIGZpbGw9IiM2QjcyODQiLz4KPC9zdmc+";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieSummary {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

impl MovieSummary {
    // A field with an unexpected JSON type counts as absent.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };
        Self {
            title: text("title"),
            original_title: text("original_title"),
            poster_path: text("poster_path"),
            vote_average: value.get("vote_average").and_then(Value::as_f64),
            release_date: text("release_date"),
            overview: text("overview"),
        }
    }

    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.original_title.as_deref()))
            .unwrap_or(UNKNOWN_TITLE)
    }

    pub fn poster_src(&self, image_base: &str) -> String {
        match non_empty(self.poster_path.as_deref()) {
            Some(path) => format!("{image_base}{path}"),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }

    // Zero reads as "N/A" too.
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v != 0.0 => format!("{v:.1}"),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBucket {
    Good,
    Okay,
    Poor,
}

impl RatingBucket {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 8.0 => RatingBucket::Good,
            Some(s) if s >= 6.0 => RatingBucket::Okay,
            _ => RatingBucket::Poor,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RatingBucket::Good => "rating-good",
            RatingBucket::Okay => "rating-okay",
            RatingBucket::Poor => "rating-poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub index: usize,
    pub title: String,
    pub poster_src: String,
    pub poster_alt: String,
    pub rating: String,
    pub bucket: RatingBucket,
    pub rating_class: &'static str,
    pub release_year: String,
    pub overview: String,
    pub detail: MovieDetail,
}

pub fn build_card(index: usize, movie: &MovieSummary, image_base: &str) -> Card {
    build_card_in(index, movie, image_base, &Local)
}

pub fn build_card_in<Tz: TimeZone>(
    index: usize,
    movie: &MovieSummary,
    image_base: &str,
    tz: &Tz,
) -> Card {
    let title = movie.display_title().to_string();
    let bucket = RatingBucket::from_score(movie.vote_average);
    Card {
        index,
        poster_alt: title.clone(),
        title,
        poster_src: movie.poster_src(image_base),
        rating: movie.rating_label(),
        bucket,
        rating_class: bucket.css_class(),
        release_year: release_year_in(movie.release_date.as_deref(), tz),
        overview: non_empty(movie.overview.as_deref())
            .unwrap_or(NO_OVERVIEW)
            .to_string(),
        detail: MovieDetail::from_movie(movie),
    }
}

// Date-only forms are UTC midnight; a timestamp without an offset is
// wall-clock time in `tz`.
pub fn release_year_in<Tz: TimeZone>(date: Option<&str>, tz: &Tz) -> String {
    let Some(raw) = non_empty(date.map(str::trim)) else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_release(raw, tz) {
        Some(d) => d.year().to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn parse_release<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Some(d.with_timezone(tz));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    let date = match raw.len() {
        4 if raw.bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1)
        }
        7 => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok(),
        _ => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
    }?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().with_timezone(tz))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub title: String,
    pub rating: String,
    pub release_date: String,
    pub overview: String,
    // Preformatted for a single-button dialog.
    pub text: String,
}

impl MovieDetail {
    pub fn from_movie(movie: &MovieSummary) -> Self {
        let title = movie.display_title().to_string();
        let rating = movie.rating_label();
        let release_date = non_empty(movie.release_date.as_deref())
            .unwrap_or("Unknown")
            .to_string();
        let overview = non_empty(movie.overview.as_deref())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{NO_OVERVIEW}."));
        let text = format!(
            "🎬 {title}\n⭐ Rating: {rating}/10\n📅 Release Date: {release_date}\n📝 Overview: {overview}"
        );
        Self {
            title,
            rating,
            release_date,
            overview,
            text,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    #[test]
    fn bucket_thresholds_are_boundary_correct() {
        assert_eq!(RatingBucket::from_score(Some(8.0)), RatingBucket::Good);
        assert_eq!(RatingBucket::from_score(Some(7.999)), RatingBucket::Okay);
        assert_eq!(RatingBucket::from_score(Some(6.0)), RatingBucket::Okay);
        assert_eq!(RatingBucket::from_score(Some(5.999)), RatingBucket::Poor);
        assert_eq!(RatingBucket::from_score(None), RatingBucket::Poor);
        assert_eq!(RatingBucket::from_score(Some(10.0)).css_class(), "rating-good");
    }

    #[test]
    fn title_falls_back_to_original_then_placeholder() {
        let mut m = MovieSummary {
            title: Some(String::new()),
            original_title: Some("Amélie".into()),
            ..Default::default()
        };
        assert_eq!(m.display_title(), "Amélie");
        m.original_title = None;
        assert_eq!(m.display_title(), UNKNOWN_TITLE);
    }

    #[test]
    fn poster_uses_base_url_or_placeholder() {
        let base = "https://image.tmdb.org/t/p/w500";
        let mut m = MovieSummary {
            poster_path: Some("/abc.jpg".into()),
            ..Default::default()
        };
        assert_eq!(m.poster_src(base), "https://image.tmdb.org/t/p/w500/abc.jpg");
        m.poster_path = None;
        assert_eq!(m.poster_src(base), PLACEHOLDER_POSTER);
    }

    #[test]
    fn rating_label_has_one_decimal_and_treats_zero_as_missing() {
        let mut m = MovieSummary {
            vote_average: Some(7.0),
            ..Default::default()
        };
        assert_eq!(m.rating_label(), "7.0");
        m.vote_average = Some(8.46);
        assert_eq!(m.rating_label(), "8.5");
        m.vote_average = Some(0.0);
        assert_eq!(m.rating_label(), "N/A");
        m.vote_average = None;
        assert_eq!(m.rating_label(), "N/A");
    }

    #[test]
    fn release_year_depends_on_viewer_zone() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let east = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(release_year_in(Some("2024-01-01"), &Utc), "2024");
        assert_eq!(release_year_in(Some("2024-01-01"), &west), "2023");
        assert_eq!(release_year_in(Some("2023-12-31T20:00:00Z"), &east), "2024");
        assert_eq!(release_year_in(Some("soon"), &Utc), "N/A");
        assert_eq!(release_year_in(Some(""), &Utc), "N/A");
        assert_eq!(release_year_in(None, &Utc), "N/A");
    }

    #[test]
    fn release_year_accepts_partial_dates_and_local_timestamps() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(release_year_in(Some("1999"), &Utc), "1999");
        assert_eq!(release_year_in(Some("1999"), &west), "1998");
        assert_eq!(release_year_in(Some("2024-03"), &Utc), "2024");
        assert_eq!(release_year_in(Some("2024-13"), &Utc), "N/A");
        assert_eq!(release_year_in(Some("2024-01-01T00:30:00"), &west), "2024");
        assert_eq!(release_year_in(Some("2024-01-01T00:30:00.250"), &west), "2024");
        assert_eq!(release_year_in(Some("2024-01-01T00:30"), &west), "2024");
        assert_eq!(release_year_in(Some("99"), &Utc), "N/A");
    }

    #[test]
    fn lenient_mapping_ignores_mistyped_fields() {
        let m = MovieSummary::from_value(&json!({
            "title": "Heat",
            "vote_average": "8.3",
            "poster_path": null,
            "release_date": 1995
        }));
        assert_eq!(m.title.as_deref(), Some("Heat"));
        assert_eq!(m.vote_average, None);
        assert_eq!(m.poster_path, None);
        assert_eq!(m.release_date, None);
    }

    #[test]
    fn card_uses_same_bucket_for_badge_and_meta() {
        let m = MovieSummary {
            title: Some("Heat".into()),
            vote_average: Some(8.3),
            release_date: Some("1995-12-15".into()),
            ..Default::default()
        };
        let card = build_card_in(3, &m, "https://img", &Utc);
        assert_eq!(card.index, 3);
        assert_eq!(card.bucket, RatingBucket::Good);
        assert_eq!(card.rating_class, "rating-good");
        assert_eq!(card.rating, "8.3");
        assert_eq!(card.release_year, "1995");
        assert_eq!(card.poster_alt, "Heat");
        assert_eq!(card.overview, NO_OVERVIEW);
        assert_eq!(card.detail.title, "Heat");
        assert_eq!(card.detail.release_date, "1995-12-15");
    }

    #[test]
    fn detail_text_uses_raw_date_and_fallbacks() {
        let d = MovieDetail::from_movie(&MovieSummary {
            title: Some("Heat".into()),
            vote_average: Some(8.3),
            release_date: Some("1995-12-15".into()),
            ..Default::default()
        });
        assert_eq!(d.release_date, "1995-12-15");
        assert_eq!(d.overview, "No overview available.");
        assert_eq!(
            d.text,
            "🎬 Heat\n⭐ Rating: 8.3/10\n📅 Release Date: 1995-12-15\n📝 Overview: No overview available."
        );

        let empty = MovieDetail::from_movie(&MovieSummary::default());
        assert_eq!(empty.release_date, "Unknown");
        assert_eq!(empty.rating, "N/A");
    }
}
