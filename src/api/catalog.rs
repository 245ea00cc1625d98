// src/api/catalog.rs

use crate::{
    api::{courses::CoursesApi, profile::ProfileApi},
    error::ApiResult,
    models::{Course, SortOption},
};
use chrono::DateTime;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<SortOption>,
}

struct AuthorInfo {
    name: String,
    avatar: String,
}

/// Catalog search over the featured-course listing, annotated with author
/// identities resolved from the public profile endpoint.
pub struct CatalogApi {
    courses: CoursesApi,
    profiles: ProfileApi,
}

impl CatalogApi {
    pub fn new(courses: CoursesApi, profiles: ProfileApi) -> Self {
        Self { courses, profiles }
    }

    pub async fn search(&self, token: &str, params: &SearchParams) -> ApiResult<Vec<Course>> {
        let mut results = self.courses.featured_courses(token).await?;

        self.annotate_authors(&mut results).await;

        if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            results.retain(|course| {
                course.title.to_lowercase().contains(&query)
                    || course.description.to_lowercase().contains(&query)
                    || course
                        .author
                        .as_deref()
                        .is_some_and(|author| author.to_lowercase().contains(&query))
            });
        }

        if let Some(category) = params.category.as_deref().filter(|c| *c != "all") {
            results.retain(|course| course.category.as_deref() == Some(category));
        }

        if let Some(sort_by) = params.sort_by {
            sort_courses(&mut results, sort_by);
        }

        Ok(results)
    }

    /// Resolves every distinct author id concurrently; a failed lookup only
    /// costs that course its attribution. No de-duplication with in-flight
    /// requests elsewhere: two overlapping searches resolve twice.
    async fn annotate_authors(&self, courses: &mut [Course]) {
        let author_ids: BTreeSet<i64> = courses.iter().filter_map(|c| c.author_id).collect();
        if author_ids.is_empty() {
            return;
        }

        let lookups = author_ids.iter().map(|&author_id| async move {
            match self.profiles.user_by_id(author_id).await {
                Ok(profile) => {
                    let name = format!("{} {}", profile.name, profile.surname)
                        .trim()
                        .to_string();
                    Some((
                        author_id,
                        AuthorInfo {
                            name,
                            avatar: profile.avatar,
                        },
                    ))
                }
                Err(err) => {
                    log::warn!("failed to resolve author profile {author_id}: {err}");
                    None
                }
            }
        });
        let authors: HashMap<i64, AuthorInfo> = futures::future::join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .collect();

        for course in courses.iter_mut() {
            let Some(info) = course.author_id.and_then(|id| authors.get(&id)) else {
                continue;
            };
            if !info.name.is_empty() {
                course.author = Some(info.name.clone());
            }
            let avatar = info.avatar.trim();
            if !avatar.is_empty() {
                course.author_avatar_url = Some(avatar.to_string());
            }
        }
    }
}

fn sort_courses(courses: &mut [Course], sort_by: SortOption) {
    match sort_by {
        SortOption::Popular | SortOption::Students => {
            courses.sort_by_key(|c| std::cmp::Reverse(c.students.unwrap_or(0)));
        }
        SortOption::Newest => {
            courses.sort_by_key(|c| {
                std::cmp::Reverse(
                    DateTime::parse_from_rfc3339(&c.created_at)
                        .map(|dt| dt.timestamp_millis())
                        .unwrap_or(0),
                )
            });
        }
        SortOption::Rating => {
            courses.sort_by(|a, b| {
                let (a, b) = (a.rating.unwrap_or(0.0), b.rating.unwrap_or(0.0));
                b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course_list::generating_placeholder;

    fn course(title: &str, students: Option<u64>, rating: Option<f64>) -> Course {
        let mut course = generating_placeholder(title, "");
        course.students = students;
        course.rating = rating;
        course
    }

    #[test]
    fn sorts_by_students_descending() {
        let mut courses = vec![
            course("a", Some(3), None),
            course("b", Some(10), None),
            course("c", None, None),
        ];
        sort_courses(&mut courses, SortOption::Popular);
        let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["b", "a", "c"]);
    }

    #[test]
    fn sorts_by_rating_descending() {
        let mut courses = vec![
            course("a", None, Some(3.5)),
            course("b", None, Some(4.9)),
            course("c", None, None),
        ];
        sort_courses(&mut courses, SortOption::Rating);
        let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["b", "a", "c"]);
    }
}
