//! Wire types for the backend API and the demo fixtures.
//!
//! Catalogue types keep the backend's Spanish field names on the wire. Order
//! types only pin down the fields this crate reads; everything else the
//! backend sends is kept in `extra` and written back unchanged.

use crate::geom::Coordinate;
use crate::wkt::{self, WktError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status the backend uses for a delivered order.
pub const STATUS_DELIVERED: &str = "ENTREGADO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
  #[serde(rename = "facultad_id")]
  pub faculty_id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "departamentos", default, skip_serializing_if = "Option::is_none")]
  pub departments: Option<Vec<Department>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
  #[serde(rename = "departamento_id")]
  pub department_id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "facultad_id")]
  pub faculty_id: i64,
  #[serde(rename = "facultad", default, skip_serializing_if = "Option::is_none")]
  pub faculty: Option<Box<Faculty>>,
  #[serde(rename = "carreras", default, skip_serializing_if = "Option::is_none")]
  pub careers: Option<Vec<Career>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
  #[serde(rename = "codigo_carrera")]
  pub code: String,
  #[serde(rename = "grado_id")]
  pub grade_id: i64,
  #[serde(rename = "antecedente_id")]
  pub antecedent_id: i64,
  #[serde(rename = "es_acreditada")]
  pub accredited: bool,
  #[serde(rename = "nombre_carrera")]
  pub name: String,
  #[serde(rename = "departamento_id")]
  pub department_id: i64,
  #[serde(rename = "departamento", default, skip_serializing_if = "Option::is_none")]
  pub department: Option<Box<Department>>,
  #[serde(rename = "facultad", default, skip_serializing_if = "Option::is_none")]
  pub faculty: Option<Box<Faculty>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub id: i64,
  pub rut: String,
  #[serde(rename = "nombres")]
  pub first_names: String,
  #[serde(rename = "apellido_paterno")]
  pub paternal_surname: String,
  #[serde(rename = "apellido_materno")]
  pub maternal_surname: String,
  #[serde(rename = "fecha_nacimiento")]
  pub birth_date: String,
  #[serde(rename = "nacionalidad")]
  pub nationality: String,
  #[serde(rename = "sexo")]
  pub sex: String,
  #[serde(rename = "estado_civil")]
  pub marital_status: String,
  #[serde(rename = "comentario", default, skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
  #[serde(rename = "fono")]
  pub phone: String,
  pub email: String,
  #[serde(rename = "email_institucional")]
  pub institutional_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delivery_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub urgent: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_price: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub client_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dealer_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company_id: Option<i64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Order {
  pub fn is_delivered(&self) -> bool {
    self.status.as_deref() == Some(STATUS_DELIVERED)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSpender {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub client_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_spent: Option<f64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotalProductsDto {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_products: Option<i64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNameAddressDto {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestDeliveryPointDto {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// POINT WKT as sent by the backend.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl NearestDeliveryPointDto {
  pub fn coordinate(&self) -> Result<Option<Coordinate>, WktError> {
    match &self.location {
      Some(text) => wkt::decode_point(text),
      None => Ok(None),
    }
  }
}

/// Body of the order status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
  pub status: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delivery_date: Option<String>,
}
