use chrono::{DateTime, Utc};

pub fn format_relative_time(when: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(when);
    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} min ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} h ago", duration.num_hours())
    } else {
        format!("{} d ago", duration.num_days())
    }
}

pub fn push_unique_url(list: &mut Vec<String>, candidate: String) {
    if !list.iter().any(|existing| existing == &candidate) {
        list.push(candidate);
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn join_url_trims_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:5000/", "/changer/status"),
            "http://127.0.0.1:5000/changer/status"
        );
    }

    #[test]
    fn join_url_passes_absolute_urls_through() {
        assert_eq!(
            join_url("http://127.0.0.1:5000", "http://10.0.0.2:5000/job/7"),
            "http://10.0.0.2:5000/job/7"
        );
    }

    #[test]
    fn push_unique_url_skips_duplicates() {
        let mut urls = Vec::new();
        push_unique_url(&mut urls, "http://a".to_string());
        push_unique_url(&mut urls, "http://a".to_string());
        push_unique_url(&mut urls, "http://b".to_string());
        assert_eq!(urls, vec!["http://a", "http://b"]);
    }

    #[test]
    fn recent_times_render_as_just_now() {
        assert_eq!(format_relative_time(Utc::now()), "just now");
        let five_min = Utc::now() - Duration::minutes(5);
        assert_eq!(format_relative_time(five_min), "5 min ago");
    }
}
