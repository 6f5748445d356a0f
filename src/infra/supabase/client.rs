//! Client for the hosted data service: PostgREST table endpoints and the storage bucket API.

use crate::domain::part::{Part, PartRow};
use crate::infra::config::SupabaseConfig;
use crate::storage::remote::{
    ColumnValue, ObjectStorage, PartTable, Predicate, RemoteError, SelectQuery,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

/// One handle per process; cheap to clone (the inner `reqwest::Client` is reference counted).
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    table: String,
    bucket: String,
}

/// Error body shape shared by the REST and storage endpoints (fields vary per endpoint).
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    /// The storage API sends this as a string or a number depending on the endpoint.
    #[serde(default, rename = "statusCode")]
    status_code: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.anon_key))?,
        );
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    async fn error_from(resp: Response) -> RemoteError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        error_from_body(status, &text)
    }

    async fn parts_from(resp: Response) -> Result<Vec<Part>, RemoteError> {
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        resp.json::<Vec<Part>>()
            .await
            .map_err(|e| RemoteError::new(format!("Invalid response body: {}", e)))
    }
}

fn error_from_body(status: StatusCode, text: &str) -> RemoteError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .or(body.details)
        .unwrap_or_else(|| format!("HTTP {}: {}", status, text));
    let status_code = body.status_code.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let code = body
        .code
        .or(status_code)
        .unwrap_or_else(|| status.as_u16().to_string());
    RemoteError::with_code(code, message)
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::new(format!("Request failed: {}", e))
}

/// Escapes `\`, `%` and `_` for `ILIKE`. PostgREST rewrites every `*` to `%`, so a literal `*`
/// cannot be sent; it goes out as the one-character wildcard and [`narrow_literal`] drops the
/// extra rows.
fn ilike_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

/// Re-applies the predicates locally when a needle had to be widened on the wire.
pub fn narrow_literal(parts: &mut Vec<Part>, query: &SelectQuery) {
    let widened = query
        .predicates
        .iter()
        .any(|p| matches!(p, Predicate::ILike(_, needle) if needle.contains('*')));
    if widened {
        parts.retain(|part| query.predicates.iter().all(|p| p.matches(part)));
    }
}

/// PostgREST filter params: `col=ilike.*needle*`, `col=eq.value`, `order=col.desc`.
pub fn query_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for predicate in &query.predicates {
        match predicate {
            Predicate::Eq(column, value) => {
                let v = match value {
                    ColumnValue::Text(s) => s.clone(),
                    ColumnValue::Int(n) => n.to_string(),
                };
                params.push((column.as_str().to_string(), format!("eq.{}", v)));
            }
            Predicate::ILike(column, needle) => {
                params.push((
                    column.as_str().to_string(),
                    format!("ilike.*{}*", ilike_pattern(needle)),
                ));
            }
        }
    }
    if let Some(order) = query.order {
        let dir = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column.as_str(), dir)));
    }
    params
}

#[async_trait]
impl PartTable for SupabaseClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Part>, RemoteError> {
        let resp = self
            .http
            .get(self.rest_url())
            .query(&query_params(query))
            .send()
            .await
            .map_err(transport_error)?;
        let mut parts = Self::parts_from(resp).await?;
        narrow_literal(&mut parts, query);
        Ok(parts)
    }

    async fn insert(&self, row: &PartRow) -> Result<Part, RemoteError> {
        let resp = self
            .http
            .post(self.rest_url())
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(transport_error)?;
        Self::parts_from(resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::new("Insert returned no row"))
    }

    async fn update(&self, id: &str, row: &PartRow) -> Result<Option<Part>, RemoteError> {
        let resp = self
            .http
            .patch(self.rest_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(transport_error)?;
        Ok(Self::parts_from(resp).await?.into_iter().next())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let resp = self
            .http
            .delete(self.rest_url())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        let resp = self
            .http
            .get(self.rest_url())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), RemoteError> {
        let resp = self
            .http
            .post(self.object_url(path))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::part::PartType;
    use crate::storage::remote::PartColumn;
    use chrono::Utc;

    #[test]
    fn builds_postgrest_filters() {
        let query = SelectQuery::new()
            .ilike(PartColumn::CarBrand, "Toy")
            .eq(PartColumn::CarYear, ColumnValue::Int(2020))
            .order_by(PartColumn::CreatedAt, false);
        let params = query_params(&query);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("car_brand".to_string(), "ilike.*Toy*".to_string()),
                ("car_year".to_string(), "eq.2020".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn ilike_needles_are_matched_literally() {
        let query = SelectQuery::new().ilike(PartColumn::CarBrand, "50%_*\\");
        let params = query_params(&query);
        assert_eq!(
            params[1],
            ("car_brand".to_string(), "ilike.*50\\%\\__\\\\*".to_string())
        );

        let part = |brand: &str| Part {
            id: brand.to_string(),
            part_type: PartType::DashKit,
            car_brand: brand.to_string(),
            car_model: "Any".to_string(),
            car_year: 2020,
            stock_number: format!("SN-{}", brand),
            image_url: "https://img/x.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut rows = vec![part("A*B"), part("AxB")];
        narrow_literal(&mut rows, &SelectQuery::new().ilike(PartColumn::CarBrand, "a*b"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].car_brand, "A*B");

        // Without a `*` the server result is taken as is.
        let mut rows = vec![part("A*B"), part("AxB")];
        narrow_literal(&mut rows, &SelectQuery::new().ilike(PartColumn::CarBrand, "zzz"));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn storage_errors_with_numeric_status_codes_keep_their_message() {
        let err = error_from_body(
            StatusCode::CONFLICT,
            r#"{"statusCode":409,"error":"Duplicate","message":"The resource already exists"}"#,
        );
        assert_eq!(err.code.as_deref(), Some("409"));
        assert_eq!(err.message, "The resource already exists");

        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"code":"23505","message":"duplicate key value"}"#,
        );
        assert!(err.is_unique_violation());

        let err = error_from_body(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.code.as_deref(), Some("502"));
        assert_eq!(err.message, "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn public_urls_point_at_the_bucket() {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: "https://demo.supabase.co/".into(),
            anon_key: "anon".into(),
            table: "car_parts".into(),
            bucket: "images".into(),
        })
        .unwrap();
        assert_eq!(
            client.public_url("car-parts/1-abc.png"),
            "https://demo.supabase.co/storage/v1/object/public/images/car-parts/1-abc.png"
        );
    }
}
