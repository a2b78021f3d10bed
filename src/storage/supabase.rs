//! Supabase store over the PostgREST HTTP interface
//!
//! Entries live in a table with Spanish column names shared with the review
//! dashboard: `nombre, telefono, direccion, barrio, poblacion, categoria`.

use crate::model::{BusinessRecord, PersistedEntry, PhoneNumber};
use crate::storage::traits::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

const SELECT_COLUMNS: &str = "id,nombre,telefono,direccion,barrio,poblacion,categoria";

/// Row as returned by PostgREST
#[derive(Debug, Deserialize)]
struct Row {
    id: i64,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    telefono: Option<String>,
    #[serde(default)]
    direccion: Option<String>,
    #[serde(default)]
    barrio: Option<String>,
    #[serde(default)]
    poblacion: Option<i64>,
    #[serde(default)]
    categoria: Option<String>,
}

impl From<Row> for PersistedEntry {
    fn from(row: Row) -> Self {
        Self {
            id: row.id,
            name: row.nombre.unwrap_or_default(),
            phone: row.telefono,
            address: row.direccion,
            area: row.barrio.unwrap_or_default(),
            expected_population: row.poblacion.unwrap_or(0).max(0) as u64,
            category: row.categoria.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NewRow<'a> {
    nombre: &'a str,
    telefono: &'a str,
    direccion: Option<&'a str>,
    barrio: &'a str,
    poblacion: u64,
    categoria: &'a str,
}

impl<'a> From<&'a BusinessRecord> for NewRow<'a> {
    fn from(record: &'a BusinessRecord) -> Self {
        Self {
            nombre: &record.name,
            telefono: record.phone.as_str(),
            direccion: record.address.as_deref(),
            barrio: &record.area,
            poblacion: record.expected_population,
            categoria: &record.category,
        }
    }
}

/// Supabase (PostgREST) store backend
pub struct SupabaseStore {
    http_client: Client,
    table_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Creates a client for `<project_url>/rest/v1/<table>`
    pub fn new(project_url: &str, api_key: impl Into<String>, table: &str) -> Self {
        Self {
            http_client: Client::new(),
            table_url: format!("{}/rest/v1/{}", project_url.trim_end_matches('/'), table),
            api_key: api_key.into(),
        }
    }

    /// Checks that the table is reachable with the configured key
    pub async fn ping(&self) -> StoreResult<()> {
        let response = self
            .http_client
            .get(&self.table_url)
            .query(&[("select", "id"), ("limit", "1")])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }
}

/// Turns a non-success response into a [`StoreError`]
async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Store for SupabaseStore {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> StoreResult<Option<PersistedEntry>> {
        let response = self
            .http_client
            .get(&self.table_url)
            .query(&[
                ("select", SELECT_COLUMNS.to_string()),
                ("telefono", format!("eq.{}", phone)),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let rows: Vec<Row> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next().map(PersistedEntry::from))
    }

    async fn insert(&self, record: &BusinessRecord) -> StoreResult<i64> {
        let response = self
            .http_client
            .post(&self.table_url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(&NewRow::from(record))
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::DuplicatePhone(record.phone.to_string()));
        }

        let rows: Vec<Row> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        rows.first()
            .map(|row| row.id)
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-key";

    fn record() -> BusinessRecord {
        BusinessRecord {
            name: "Bar Pepe".to_string(),
            phone: PhoneNumber::parse("612345678").unwrap(),
            address: None,
            area: "Centro".to_string(),
            expected_population: 5000,
            category: "Bar".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_phone_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/negocios"))
            .and(query_param("telefono", "eq.612345678"))
            .and(query_param("limit", "1"))
            .and(header("apikey", KEY))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 7,
                "nombre": "Bar Pepe",
                "telefono": "612345678",
                "direccion": null,
                "barrio": "Centro",
                "poblacion": 5000,
                "categoria": "Bar"
            }])))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), KEY, "negocios");
        let phone = PhoneNumber::parse("612345678").unwrap();
        let entry = store.find_by_phone(&phone).await.unwrap().unwrap();

        assert_eq!(entry.id, 7);
        assert_eq!(entry.name, "Bar Pepe");
        assert_eq!(entry.area, "Centro");
        assert_eq!(entry.address, None);
    }

    #[tokio::test]
    async fn test_find_by_phone_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/negocios"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), KEY, "negocios");
        let phone = PhoneNumber::parse("699999999").unwrap();
        assert!(store.find_by_phone(&phone).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/negocios"))
            .and(header("Prefer", "return=representation"))
            .and(body_partial_json(json!({
                "nombre": "Bar Pepe",
                "telefono": "612345678",
                "barrio": "Centro",
                "poblacion": 5000,
                "categoria": "Bar"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "id": 42,
                "nombre": "Bar Pepe",
                "telefono": "612345678"
            }])))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&format!("{}/", server.uri()), KEY, "negocios");
        assert_eq!(store.insert(&record()).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_insert_conflict_is_duplicate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/negocios"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint"
            })))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), KEY, "negocios");
        let result = store.insert(&record()).await;
        assert!(matches!(result, Err(StoreError::DuplicatePhone(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), KEY, "negocios");
        let result = store.ping().await;
        assert!(matches!(
            result,
            Err(StoreError::Status { status: 401, ref body }) if body == "Invalid API key"
        ));
    }
}
