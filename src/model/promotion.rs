use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    core::{
        error::ValidationError,
        utils::{datetime_to_string, now, parse_iso_datetime},
    },
    schema::promotion::PromotionResponse,
};

pub const TABLE_NAME: &str = "public.promotion";

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Promotion {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub active_status: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub product_ids: Option<Vec<String>>,
    pub extra: Option<Value>,
}

/// Client-settable part of a promotion, fully validated.
struct PromotionInput {
    name: String,
    description: Option<String>,
    start_date: DateTime<FixedOffset>,
    end_date: DateTime<FixedOffset>,
    active_status: bool,
    created_by: Uuid,
    updated_by: Uuid,
    product_ids: Option<Vec<String>>,
    extra: Option<Value>,
}

impl PromotionInput {
    fn parse(data: &Value) -> Result<Self, ValidationError> {
        let data = data
            .as_object()
            .ok_or_else(|| ValidationError::bad_type("body", "expected a JSON object"))?;

        let name = required_string(data, "name")?;
        if name.trim().is_empty() {
            return Err(ValidationError::bad_value("name", "must not be empty"));
        }
        let start_date = required_datetime(data, "start_date")?;
        let end_date = required_datetime(data, "end_date")?;
        let active_status = match required(data, "active_status")? {
            Value::Bool(val) => *val,
            other => return Err(ValidationError::bad_type("active_status", other)),
        };
        let created_by = required_uuid(data, "created_by")?;
        let updated_by = required_uuid(data, "updated_by")?;

        let description = match data.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(val)) => Some(val.clone()),
            Some(other) => return Err(ValidationError::bad_type("description", other)),
        };
        let product_ids = match data.get("product_ids") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(val) => Ok(val.clone()),
                        other => Err(ValidationError::bad_type("product_ids", other)),
                    })
                    .collect::<Result<Vec<String>, ValidationError>>()?,
            ),
            Some(other) => return Err(ValidationError::bad_type("product_ids", other)),
        };
        let extra = match data.get("extra") {
            None | Some(Value::Null) => None,
            Some(val @ Value::Object(_)) => Some(val.clone()),
            Some(other) => return Err(ValidationError::bad_type("extra", other)),
        };

        Ok(Self {
            name,
            description,
            start_date,
            end_date,
            active_status,
            created_by,
            updated_by,
            product_ids,
            extra,
        })
    }
}

fn required<'a>(data: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    data.get(field).ok_or_else(|| ValidationError::missing(field))
}

fn required_string(data: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match required(data, field)? {
        Value::String(val) => Ok(val.clone()),
        other => Err(ValidationError::bad_type(field, other)),
    }
}

fn required_datetime(
    data: &Map<String, Value>,
    field: &str,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    let value = required_string(data, field)?;
    parse_iso_datetime(&value).ok_or_else(|| {
        ValidationError::bad_format(field, format!("invalid isoformat string: '{}'", value))
    })
}

fn required_uuid(data: &Map<String, Value>, field: &str) -> Result<Uuid, ValidationError> {
    let value = required_string(data, field)?;
    Uuid::parse_str(&value).map_err(|err| ValidationError::bad_value(field, err))
}

impl Promotion {
    /// Build a new promotion from request data. The id and both audit
    /// timestamps are always assigned here, whatever the input contains.
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let input = PromotionInput::parse(data)?;
        let created_at = now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            active_status: input.active_status,
            created_by: input.created_by,
            updated_by: input.updated_by,
            created_at,
            updated_at: created_at,
            product_ids: input.product_ids,
            extra: input.extra,
        })
    }

    /// Replace every settable field from request data.
    ///
    /// The whole input is validated before anything is assigned, so on error
    /// the promotion is left untouched. Absent optional fields are cleared,
    /// never merged.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, ValidationError> {
        let input = PromotionInput::parse(data)?;
        self.name = input.name;
        self.description = input.description;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.active_status = input.active_status;
        self.created_by = input.created_by;
        self.updated_by = input.updated_by;
        self.product_ids = input.product_ids;
        self.extra = input.extra;
        Ok(self)
    }

    pub fn serialize(&self) -> PromotionResponse {
        PromotionResponse {
            id: self.id.to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: datetime_to_string(self.start_date),
            end_date: datetime_to_string(self.end_date),
            active_status: self.active_status,
            created_by: self.created_by.to_string(),
            updated_by: self.updated_by.to_string(),
            created_at: datetime_to_string(self.created_at),
            updated_at: datetime_to_string(self.updated_at),
            product_ids: self.product_ids.clone(),
            extra: self.extra.clone(),
        }
    }

    pub fn activate(&mut self) {
        self.active_status = true;
        self.touch(now());
    }

    pub fn deactivate(&mut self) {
        self.active_status = false;
        self.touch(now());
    }

    pub fn touch(&mut self, now: DateTime<FixedOffset>) {
        self.updated_at = now;
    }

    pub fn has_product(&self, product_id: &str) -> bool {
        self.product_ids
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == product_id))
    }
}
