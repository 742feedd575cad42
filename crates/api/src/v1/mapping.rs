//! Record-to-response mapping seam.
//!
//! Handlers return domain records; a [`ResponseMapper`] decides what the
//! client sees. Mappers run after validation succeeded, so they may assume
//! well-formed inputs and only shape output (rename fields, drop internal
//! ones, derive display values).

use serde::Serialize;

/// Maps one domain record into its client-visible form.
pub trait ResponseMapper<Record> {
    /// Serializable response shape.
    type Response: Serialize;

    /// Shape a single record.
    fn map(&self, record: &Record) -> Self::Response;
}

impl<Record, Response, F> ResponseMapper<Record> for F
where
    F: Fn(&Record) -> Response,
    Response: Serialize,
{
    type Response = Response;

    fn map(&self, record: &Record) -> Response {
        self(record)
    }
}

/// Shape every record of a collection, keeping order.
pub fn map_all<'a, Record, M>(
    mapper: &M,
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<M::Response>
where
    Record: 'a,
    M: ResponseMapper<Record> + ?Sized,
{
    records.into_iter().map(|record| mapper.map(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    struct UserRecord {
        id: u64,
        email: String,
        password_hash: String,
        status_id: u8,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct UserResponse {
        user_id: u64,
        email: String,
        status: &'static str,
    }

    struct UserMapper;

    impl ResponseMapper<UserRecord> for UserMapper {
        type Response = UserResponse;

        fn map(&self, record: &UserRecord) -> UserResponse {
            UserResponse {
                user_id: record.id,
                email: record.email.clone(),
                status: if record.status_id == 1 { "active" } else { "inactive" },
            }
        }
    }

    fn user(id: u64, status_id: u8) -> UserRecord {
        UserRecord {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "x".repeat(8),
            status_id,
        }
    }

    #[test]
    fn mapper_drops_internal_fields_and_derives_values() -> Result<(), Box<dyn Error>> {
        let record = user(1, 1);
        assert!(!record.password_hash.is_empty());
        let shaped = serde_json::to_value(UserMapper.map(&record))?;
        assert_eq!(
            shaped,
            json!({"userId": 1, "email": "user1@example.com", "status": "active"})
        );
        Ok(())
    }

    #[test]
    fn closures_are_mappers() {
        let records = [user(1, 1), user(2, 0)];
        let ids = map_all(&|record: &UserRecord| record.id, &records);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn map_all_keeps_order() {
        let records = vec![user(3, 0), user(1, 1)];
        let shaped = map_all(&UserMapper, &records);
        let statuses: Vec<&str> = shaped.iter().map(|item| item.status).collect();
        assert_eq!(statuses, vec!["inactive", "active"]);
    }
}
