//! RateMyProfessors GraphQL client.
//!
//! Concrete [`ReviewSource`] implementation speaking the site's public
//! GraphQL endpoint. Uses browser-like headers to avoid bot blocking
//! and a hard per-request timeout; pagination policy lives in the
//! fetcher, this client only knows how to get one page.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::resolver::CanonicalId;
use crate::source::{RawReview, ReviewPage, ReviewSource, SourceError};

/// GraphQL endpoint for ratings queries.
const GRAPHQL_URL: &str = "https://www.ratemyprofessors.com/graphql";

/// Per-page request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Ratings query with cursor-based pagination.
const RATINGS_QUERY: &str = r#"
query RatingsListQuery(
  $count: Int!
  $id: ID!
  $courseFilter: String
  $cursor: String
) {
  node(id: $id) {
    __typename
    ... on Teacher {
      id
      legacyId
      firstName
      lastName
      numRatings
      ratings(first: $count, after: $cursor, courseFilter: $courseFilter) {
        edges {
          cursor
          node {
            id
            comment
            date
            class
            clarityRating
            difficultyRating
            __typename
          }
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    query: &'a str,
    variables: RatingsVariables<'a>,
}

#[derive(Debug, Serialize)]
struct RatingsVariables<'a> {
    count: u32,
    id: &'a str,
    #[serde(rename = "courseFilter")]
    course_filter: Option<&'a str>,
    cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    node: Option<TeacherNode>,
}

#[derive(Debug, Deserialize)]
struct TeacherNode {
    ratings: Option<RatingsConnection>,
}

#[derive(Debug, Deserialize)]
struct RatingsConnection {
    #[serde(default)]
    edges: Vec<RatingEdge>,
    #[serde(rename = "pageInfo", default)]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct RatingEdge {
    node: RawReview,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage", default)]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

/// RateMyProfessors GraphQL review source.
pub struct RmpClient {
    client: reqwest::Client,
}

impl RmpClient {
    /// Create a new client with browser-like headers.
    ///
    /// The endpoint answers 403 to requests that look automated, so
    /// the headers mirror a desktop browser session.
    pub fn new() -> Result<Self, SourceError> {
        let user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, "*/*".parse().unwrap());
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.6".parse().unwrap(),
        );
        headers.insert(reqwest::header::ORIGIN, "https://www.ratemyprofessors.com".parse().unwrap());
        headers.insert(
            reqwest::header::REFERER,
            "https://www.ratemyprofessors.com/".parse().unwrap(),
        );
        headers.insert(reqwest::header::CACHE_CONTROL, "no-cache".parse().unwrap());

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReviewSource for RmpClient {
    async fn fetch_page(
        &self,
        professor_id: &CanonicalId,
        course_filter: Option<&str>,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ReviewPage, SourceError> {
        let payload = GraphQlRequest {
            operation_name: "RatingsListQuery",
            query: RATINGS_QUERY,
            variables: RatingsVariables {
                count: page_size,
                id: professor_id.as_str(),
                course_filter,
                cursor,
            },
        };

        debug!(id = %professor_id, cursor = ?cursor, "Requesting ratings page");

        let response = self
            .client
            .post(GRAPHQL_URL)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Ratings request rejected");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Schema(e.to_string()))?;

        if let Some(errors) = parsed.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::Query(messages.join("; ")));
        }

        let ratings = parsed
            .data
            .and_then(|d| d.node)
            .and_then(|n| n.ratings)
            .ok_or_else(|| SourceError::Schema("missing node.ratings in response".into()))?;

        Ok(ReviewPage {
            reviews: ratings.edges.into_iter().map(|e| e.node).collect(),
            has_next_page: ratings.page_info.has_next_page,
            end_cursor: ratings.page_info.end_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "data": {
                "node": {
                    "__typename": "Teacher",
                    "ratings": {
                        "edges": [
                            {"cursor": "YXJy", "node": {
                                "comment": "Great lectures",
                                "date": "2024-02-01 17:03:01 +0000 UTC",
                                "clarityRating": 5,
                                "difficultyRating": 2
                            }}
                        ],
                        "pageInfo": {"hasNextPage": true, "endCursor": "YXJy"}
                    }
                }
            }
        }"#;

        let parsed: GraphQlResponse = serde_json::from_str(body).unwrap();
        let ratings = parsed.data.unwrap().node.unwrap().ratings.unwrap();
        assert_eq!(ratings.edges.len(), 1);
        assert_eq!(ratings.edges[0].node.clarity_rating, Some(5.0));
        assert!(ratings.page_info.has_next_page);
        assert_eq!(ratings.page_info.end_cursor.as_deref(), Some("YXJy"));
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"errors": [{"message": "Invalid ID"}], "data": null}"#;
        let parsed: GraphQlResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.errors.unwrap()[0].message, "Invalid ID");
    }

    #[test]
    fn test_missing_page_info_defaults_to_terminal() {
        let body = r#"{
            "data": {"node": {"ratings": {"edges": []}}}
        }"#;
        let parsed: GraphQlResponse = serde_json::from_str(body).unwrap();
        let ratings = parsed.data.unwrap().node.unwrap().ratings.unwrap();
        assert!(!ratings.page_info.has_next_page);
        assert!(ratings.page_info.end_cursor.is_none());
    }
}
