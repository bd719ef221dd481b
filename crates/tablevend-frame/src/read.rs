//! The authorized-read flow.

use jiff::Timestamp;
use polars::prelude::DataFrame;
use tablevend_core::{Error, Result, StorageScheme, TableAccess};
use tablevend_object::{ConnectOptions, ObjectStoreClient, connect};

use crate::TRACING_TARGET_READ;
use crate::engine::{ReadEngine, materialize, parse_csv};

/// Reads the authorized column subset of the table described by `access`
/// through an already-connected store.
///
/// Objects under the recorded prefix are matched against the declared
/// classification's file extension, parsed, projected per file to the
/// authorized columns, and concatenated in key order. Fails with
/// `UnsupportedFormat` before any store access when the classification has
/// no engine, and with `CredentialsExpired` when the vended credentials are
/// past expiry.
pub async fn read_table(
    client: &ObjectStoreClient,
    access: &TableAccess,
    engine: ReadEngine,
) -> Result<DataFrame> {
    access.ensure_fresh(Timestamp::now())?;
    let extension = access.classification.file_extension().ok_or_else(|| {
        Error::unsupported_format().with_message(format!(
            "no read engine for classification `{}`",
            access.classification
        ))
    })?;
    let suffix = format!(".{extension}");

    let mut keys: Vec<String> = client
        .list(access.location.prefix())
        .await?
        .into_iter()
        .map(|meta| meta.location.to_string())
        .filter(|key| key.ends_with(&suffix))
        .collect();
    keys.sort();

    if keys.is_empty() {
        return Err(Error::not_found().with_message(format!(
            "no `{suffix}` objects under {}",
            access.location
        )));
    }

    let mut frames = Vec::with_capacity(keys.len());
    for key in &keys {
        tracing::debug!(target: TRACING_TARGET_READ, key = %key, "reading data object");
        let data = client.get(key).await?;
        frames.push(parse_csv(key, &data)?);
    }

    let df = materialize(frames, &access.columns, engine)?;
    tracing::info!(
        target: TRACING_TARGET_READ,
        files = keys.len(),
        rows = df.height(),
        columns = df.width(),
        "authorized read complete"
    );
    Ok(df)
}

/// Connects to the object store with the record's vended credentials, then
/// reads the authorized column subset.
///
/// `scheme` only affects how the location URI is reported; path and
/// credentials are identical under either scheme.
pub async fn read(
    access: &TableAccess,
    engine: ReadEngine,
    scheme: StorageScheme,
    options: &ConnectOptions,
) -> Result<DataFrame> {
    let client = connect(access, options)?;
    tracing::info!(
        target: TRACING_TARGET_READ,
        uri = %access.location.url(scheme),
        engine = ?engine,
        "reading table with vended credentials"
    );
    read_table(&client, access, engine).await
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;
    use object_store::path::Path;
    use object_store::{ObjectStore, PutPayload};
    use tablevend_core::{Classification, ErrorKind, TableLocation, VendedCredentials};

    use super::*;

    const FAR_FUTURE: i64 = 4_102_444_800;

    async fn seeded_client(entries: &[(&str, &str)]) -> ObjectStoreClient {
        let store = InMemory::new();
        for (key, body) in entries {
            store
                .put(&Path::from(*key), PutPayload::from(body.to_string()))
                .await
                .unwrap();
        }
        ObjectStoreClient::new(store)
    }

    fn access(columns: &[&str], classification: Classification, expire_at: i64) -> TableAccess {
        TableAccess {
            credentials: VendedCredentials {
                access_key_id: "AKIATEST".into(),
                secret_access_key: "secret".into(),
                session_token: "token".into(),
                expiration: Timestamp::from_second(expire_at).unwrap(),
            },
            location: TableLocation::parse("s3://bucket/db/table").unwrap(),
            classification,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn output_columns_equal_exactly_the_authorized_list() {
        let client = seeded_client(&[(
            "db/table/part-0.csv",
            "id,name,total\n1,alice,10\n2,bob,20\n",
        )])
        .await;
        let access = access(&["total", "id"], Classification::Csv, FAR_FUTURE);

        for engine in [ReadEngine::Eager, ReadEngine::Lazy] {
            let df = read_table(&client, &access, engine).await.unwrap();
            let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
            assert_eq!(names, vec!["total", "id"], "engine {engine:?}");
            assert_eq!(df.height(), 2);
        }
    }

    #[tokio::test]
    async fn two_files_read_as_the_union_of_rows() {
        let client = seeded_client(&[
            ("db/table/part-0.csv", "id,name,total\n1,alice,10\n"),
            ("db/table/part-1.csv", "id,name,total\n2,bob,20\n3,carol,30\n"),
            ("db/table/_manifest.json", "{}"),
        ])
        .await;
        let access = access(&["id"], Classification::Csv, FAR_FUTURE);

        let df = read_table(&client, &access, ReadEngine::Eager).await.unwrap();
        assert_eq!(df.height(), 3);
        let ids: Vec<i64> = df
            .column("id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unsupported_classification_fails_without_store_access() {
        // Empty store: any store access would fail differently, so an
        // UnsupportedFormat error proves nothing was listed or fetched.
        let client = seeded_client(&[]).await;
        let access = access(
            &["id"],
            Classification::Other("parquet".into()),
            FAR_FUTURE,
        );

        let err = read_table(&client, &access, ReadEngine::Eager).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[tokio::test]
    async fn expired_credentials_fail_before_store_access() {
        let client = seeded_client(&[("db/table/part-0.csv", "id\n1\n")]).await;
        let access = access(&["id"], Classification::Csv, 1_000);

        let err = read_table(&client, &access, ReadEngine::Eager).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialsExpired);
    }

    #[tokio::test]
    async fn read_rejects_expired_credentials() {
        // `connect` only constructs the client; expiry is caught before any
        // request leaves the process.
        let access = access(&["id"], Classification::Csv, 1_000);
        let options = ConnectOptions::default();

        let err = read(&access, ReadEngine::Eager, StorageScheme::S3, &options)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialsExpired);
    }

    #[tokio::test]
    async fn empty_prefix_is_not_found() {
        let client = seeded_client(&[("db/other/part-0.csv", "id\n1\n")]).await;
        let access = access(&["id"], Classification::Csv, FAR_FUTURE);

        let err = read_table(&client, &access, ReadEngine::Eager).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn lazy_engine_returns_the_same_table() {
        let client = seeded_client(&[
            ("db/table/part-0.csv", "id,name,total\n1,alice,10\n"),
            ("db/table/part-1.csv", "id,name,total\n2,bob,20\n"),
        ])
        .await;
        let access = access(&["id", "total"], Classification::Csv, FAR_FUTURE);

        let eager = read_table(&client, &access, ReadEngine::Eager).await.unwrap();
        let lazy = read_table(&client, &access, ReadEngine::Lazy).await.unwrap();
        assert!(eager.equals(&lazy));
    }
}
