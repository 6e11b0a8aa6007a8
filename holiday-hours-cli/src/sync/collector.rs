//! Cursor-paginated collection
//!
//! Follows `next_page_token` until the server stops returning one. Any
//! failure aborts the whole collection; partial results are never returned.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::PhoneClient;
use crate::api::constants::{Listing, PAGE_SIZE};

/// Fetch every item of `listing`, in server order
pub async fn collect_all<T: DeserializeOwned>(client: &PhoneClient, listing: Listing) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let mut query = vec![("page_size", PAGE_SIZE.to_string())];
        if let Some(token) = &token {
            query.push(("next_page_token", token.clone()));
        }

        let page: Map<String, Value> = client
            .get_json(listing.path, &query)
            .await
            .with_context(|| format!("Failed to list {}", listing.items_key))?;
        pages += 1;

        let (page_items, next) = split_page::<T>(page, listing.items_key)?;
        debug!(
            "Fetched page {} of {} ({} items)",
            pages,
            listing.items_key,
            page_items.len()
        );
        items.extend(page_items);

        match next {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

/// Pull the items array and the continuation token out of a listing page.
/// A missing items key is an empty page; an empty token ends the listing.
fn split_page<T: DeserializeOwned>(
    mut page: Map<String, Value>,
    items_key: &str,
) -> Result<(Vec<T>, Option<String>)> {
    let items = match page.remove(items_key) {
        Some(Value::Null) | None => Vec::new(),
        Some(value) => serde_json::from_value(value)
            .with_context(|| format!("Unexpected shape for '{}' in listing page", items_key))?,
    };

    let next = page
        .get("next_page_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    Ok((items, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::test_client;
    use crate::api::constants::{CALL_QUEUES, SITES};
    use crate::api::{PhoneEntity, Site};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_follows_tokens_and_keeps_server_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/phone/call_queues"))
            .and(query_param("page_size", "300"))
            .and(query_param_is_missing("next_page_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "call_queues": [
                    {"id": "cq1", "extension_id": "e1"},
                    {"id": "cq2", "extension_id": "e2"}
                ],
                "next_page_token": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/phone/call_queues"))
            .and(query_param("page_size", "300"))
            .and(query_param("next_page_token", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "call_queues": [{"id": "cq3", "extension_id": "e3"}],
                "next_page_token": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let queues: Vec<PhoneEntity> = collect_all(&test_client(&server), CALL_QUEUES)
            .await
            .unwrap();

        let ids: Vec<&str> = queues.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["cq1", "cq2", "cq3"]);
    }

    #[tokio::test]
    async fn test_failed_page_aborts_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/phone/sites"))
            .and(query_param_is_missing("next_page_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sites": [{"id": "s1", "name": "HQ"}],
                "next_page_token": "p2"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/phone/sites"))
            .and(query_param("next_page_token", "p2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = collect_all::<Site>(&test_client(&server), SITES)
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Failed to list sites"));
        assert!(message.contains("500"));
    }

    #[test]
    fn test_missing_items_key_is_empty_page() {
        let page = json!({"total_records": 0}).as_object().unwrap().clone();
        let (items, next) = split_page::<Site>(page, "sites").unwrap();

        assert!(items.is_empty());
        assert!(next.is_none());
    }
}
