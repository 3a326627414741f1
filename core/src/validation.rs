use crate::{
    error::{Result, TodoError},
    models::{CreateTodoRequest, DeleteTodoRequest, ReadTodoRequest, UpdateTodoRequest, DEFAULT_PAGE_SIZE},
};

/// Boundary-layer validation for TODO requests.
///
/// These checks run before the service is invoked and produce
/// `TodoError::Validation`. The service performs its own, narrower checks on
/// update (zero id, empty subject) which produce domain errors instead.
pub struct TodoValidator;

impl TodoValidator {
    /// Validate a create request
    ///
    /// The subject is required; the description may be empty.
    pub fn validate_create(request: &CreateTodoRequest) -> Result<()> {
        Self::validate_subject(&request.subject)
    }

    /// Validate an update request
    ///
    /// # Returns
    /// * `Ok(())` - If the id is non-zero and the subject is present
    /// * `Err(TodoError::Validation)` - Otherwise
    pub fn validate_update(request: &UpdateTodoRequest) -> Result<()> {
        if request.id == 0 {
            return Err(TodoError::empty_field("id"));
        }
        Self::validate_subject(&request.subject)
    }

    /// Validate a delete request; at least one id is required
    pub fn validate_delete(request: &DeleteTodoRequest) -> Result<()> {
        if request.ids.is_empty() {
            return Err(TodoError::empty_field("ids"));
        }
        Ok(())
    }

    /// Validate a subject string
    pub fn validate_subject(subject: &str) -> Result<()> {
        if subject.is_empty() {
            return Err(TodoError::empty_field("subject"));
        }
        Ok(())
    }

    /// Parse raw `prev_id` / `size` query values into a page request
    ///
    /// Absent or empty values fall back to the defaults (`prev_id = 0`,
    /// `size = 10`). A size of zero also means "use the default".
    ///
    /// # Returns
    /// * `Ok(ReadTodoRequest)` - The parsed page request
    /// * `Err(TodoError::Validation)` - If a value is not an integer or is negative
    pub fn parse_read_query(prev_id: Option<&str>, size: Option<&str>) -> Result<ReadTodoRequest> {
        let prev_id = match prev_id.filter(|raw| !raw.is_empty()) {
            Some(raw) => Self::parse_non_negative("prev_id", raw)?,
            None => 0,
        };

        let size = match size.filter(|raw| !raw.is_empty()) {
            Some(raw) => Self::parse_non_negative("size", raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(ReadTodoRequest {
            prev_id,
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        })
    }

    fn parse_non_negative(field: &str, raw: &str) -> Result<i64> {
        let value: i64 = raw
            .parse()
            .map_err(|e| TodoError::invalid_field(field, e))?;
        if value < 0 {
            return Err(TodoError::invalid_field(field, "must not be negative"));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_create() {
        let valid = CreateTodoRequest {
            subject: "buy milk".to_string(),
            description: String::new(),
        };
        assert!(TodoValidator::validate_create(&valid).is_ok());

        let invalid = CreateTodoRequest::default();
        let err = TodoValidator::validate_create(&invalid).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_update() {
        let valid = UpdateTodoRequest {
            id: 3,
            subject: "renamed".to_string(),
            description: String::new(),
        };
        assert!(TodoValidator::validate_update(&valid).is_ok());

        let missing_id = UpdateTodoRequest {
            id: 0,
            ..valid.clone()
        };
        assert!(TodoValidator::validate_update(&missing_id).unwrap_err().is_validation());

        let missing_subject = UpdateTodoRequest {
            subject: String::new(),
            ..valid
        };
        assert!(TodoValidator::validate_update(&missing_subject).unwrap_err().is_validation());
    }

    #[test]
    fn test_validate_delete() {
        assert!(TodoValidator::validate_delete(&DeleteTodoRequest { ids: vec![1] }).is_ok());
        assert!(TodoValidator::validate_delete(&DeleteTodoRequest::default()).is_err());
    }

    #[test]
    fn test_parse_read_query_defaults() {
        let req = TodoValidator::parse_read_query(None, None).unwrap();
        assert_eq!(req, ReadTodoRequest { prev_id: 0, size: 10 });

        let req = TodoValidator::parse_read_query(Some(""), Some("")).unwrap();
        assert_eq!(req, ReadTodoRequest { prev_id: 0, size: 10 });

        let req = TodoValidator::parse_read_query(None, Some("0")).unwrap();
        assert_eq!(req.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_parse_read_query_values() {
        let req = TodoValidator::parse_read_query(Some("42"), Some("5")).unwrap();
        assert_eq!(req, ReadTodoRequest { prev_id: 42, size: 5 });

        let req = TodoValidator::parse_read_query(Some("7"), None).unwrap();
        assert_eq!(req, ReadTodoRequest { prev_id: 7, size: 10 });
    }

    #[test]
    fn test_parse_read_query_rejects_malformed() {
        assert!(TodoValidator::parse_read_query(Some("abc"), None).unwrap_err().is_validation());
        assert!(TodoValidator::parse_read_query(None, Some("1.5")).unwrap_err().is_validation());
        assert!(TodoValidator::parse_read_query(Some("-1"), None).unwrap_err().is_validation());
        assert!(TodoValidator::parse_read_query(None, Some("-10")).unwrap_err().is_validation());
    }
}
