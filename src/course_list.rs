// src/course_list.rs

//! Course list assembly for the generation window.
//!
//! Creation is two-phase: the caller surfaces a local placeholder the
//! instant the creation request is submitted, and the backend may echo the
//! same course early with zero lessons. These helpers keep one logical
//! course from appearing twice and keep UI references stable while the
//! placeholder is reconciled with the server's record.

use crate::models::{Course, CourseStatus};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Fabricates the client-side `generating` placeholder shown while the
/// backend builds the course. The `gen_*` id is client-local and stays
/// stable for the whole generation window.
pub fn generating_placeholder(title: &str, description: &str) -> Course {
    let now = crate::models::api::now_timestamp();
    let title = title.trim();
    let description = description.trim();
    Course {
        id: format!("gen_{}", Utc::now().timestamp_millis()),
        backend_id: None,
        author_id: None,
        title: if title.is_empty() { "Untitled Course" } else { title }.to_string(),
        description: if description.is_empty() {
            "Generating course..."
        } else {
            description
        }
        .to_string(),
        lessons: 0,
        progress: 0,
        created_at: now.clone(),
        updated_at: now,
        category: None,
        author: None,
        author_avatar_url: None,
        rating: None,
        ratings_count: None,
        students: None,
        is_public: None,
        is_in_mine: None,
        is_mine: None,
        state: None,
        status: CourseStatus::Generating,
        modules: Vec::new(),
    }
}

/// Replaces the placeholder's fields in place with the server's
/// authoritative record, preserving the client-local id so existing UI
/// references keep resolving.
pub fn reconcile_placeholder(placeholder: &mut Course, server_course: Course) {
    let local_id = std::mem::take(&mut placeholder.id);
    *placeholder = server_course;
    placeholder.id = local_id;
}

/// Creation failure path: the placeholder stays in the list so the caller
/// can show a dismissible notification. No automatic retry.
pub fn mark_placeholder_failed(placeholder: &mut Course) {
    placeholder.status = CourseStatus::Failed;
}

/// Combines locally tracked courses (placeholders and fresh creations) with
/// the backend listing. A backend row whose id matches a local course's
/// `backend_id` is suppressed in favor of the local entry; the result is
/// sorted by creation time, newest first.
pub fn merge_course_lists(local: &[Course], remote: Vec<Course>) -> Vec<Course> {
    let claimed: HashSet<i64> = local.iter().filter_map(|c| c.backend_id).collect();

    let mut merged: Vec<Course> = local.to_vec();
    merged.extend(
        remote
            .into_iter()
            .filter(|course| course.backend_id.is_none_or(|id| !claimed.contains(&id))),
    );
    merged.sort_by_key(|course| std::cmp::Reverse(created_at_millis(course)));
    merged
}

fn created_at_millis(course: &Course) -> i64 {
    DateTime::parse_from_rfc3339(&course.created_at)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, backend_id: Option<i64>, created_at: &str) -> Course {
        let mut course = generating_placeholder("t", "d");
        course.id = id.to_string();
        course.backend_id = backend_id;
        course.created_at = created_at.to_string();
        course
    }

    #[test]
    fn placeholder_defaults_empty_fields() {
        let placeholder = generating_placeholder("  ", "");
        assert!(placeholder.id.starts_with("gen_"));
        assert_eq!(placeholder.title, "Untitled Course");
        assert_eq!(placeholder.description, "Generating course...");
        assert_eq!(placeholder.status, CourseStatus::Generating);
        assert_eq!(placeholder.lessons, 0);
    }

    #[test]
    fn reconcile_keeps_the_client_local_id() {
        let mut placeholder = generating_placeholder("Rust", "intro");
        let local_id = placeholder.id.clone();

        let mut server = course("42", Some(42), "2026-02-01T00:00:00Z");
        server.title = "Rust Basics".to_string();
        server.lessons = 8;
        server.status = CourseStatus::Ready;

        reconcile_placeholder(&mut placeholder, server);
        assert_eq!(placeholder.id, local_id);
        assert_eq!(placeholder.backend_id, Some(42));
        assert_eq!(placeholder.title, "Rust Basics");
        assert_eq!(placeholder.lessons, 8);
        assert_eq!(placeholder.status, CourseStatus::Ready);
    }

    #[test]
    fn backend_duplicate_is_suppressed_in_favor_of_local_entry() {
        let mut local = course("gen_1", Some(42), "2026-03-01T00:00:00Z");
        local.status = CourseStatus::Generating;

        // The backend already returns the same course, with zero lessons.
        let mut remote = course("42", Some(42), "2026-03-01T00:00:05Z");
        remote.lessons = 0;

        let merged = merge_course_lists(&[local], vec![remote]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "gen_1");
        assert_eq!(merged[0].status, CourseStatus::Generating);
    }

    #[test]
    fn merged_list_is_sorted_newest_first() {
        let old = course("1", Some(1), "2026-01-01T00:00:00Z");
        let newer = course("2", Some(2), "2026-05-01T00:00:00Z");
        let local = course("gen_9", None, "2026-06-01T00:00:00Z");
        let broken = course("3", Some(3), "sometime");

        let merged = merge_course_lists(&[local], vec![old, newer, broken]);
        let ids: Vec<&str> = merged.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["gen_9", "2", "1", "3"]);
    }

    #[test]
    fn remote_without_backend_id_is_kept() {
        let local = course("gen_1", Some(42), "2026-03-01T00:00:00Z");
        let remote = course("x", None, "2026-02-01T00:00:00Z");
        let merged = merge_course_lists(&[local], vec![remote]);
        assert_eq!(merged.len(), 2);
    }
}
