use super::{read_json, read_optional_json, ApiClient, ApiError};
use crate::models::{
  Order, OrderNameAddressDto, OrderTotalProductsDto, Product, StatusUpdate, TopSpender,
  STATUS_DELIVERED,
};
use chrono::Utc;
use log::{debug, error, info};
use reqwest::{Method, StatusCode};
use serde::Deserialize;

#[derive(Deserialize)]
struct BackendMessage {
  message: Option<String>,
}

impl ApiClient {
  pub fn get_all_orders(&self) -> Result<Vec<Order>, ApiError> {
    self.send_json(self.request(Method::GET, "/orders"), "Error fetching orders")
  }

  pub fn get_order_by_id(&self, id: i64) -> Result<Order, ApiError> {
    self.send_json(
      self.request(Method::GET, &format!("/orders/{}", id)),
      "Error fetching order",
    )
  }

  pub fn update_order(&self, id: i64, order: &Order) -> Result<Order, ApiError> {
    self.send_json(
      self
        .request(Method::PUT, &format!("/orders/{}", id))
        .json(order),
      "Error updating order",
    )
  }

  /// `delivery_date` is only sent along with the delivered status.
  pub fn update_order_status_by_dealer_id(
    &self,
    order_id: i64,
    dealer_id: i64,
    status: &str,
    delivery_date: Option<&str>,
  ) -> Result<Option<Order>, ApiError> {
    let body = StatusUpdate {
      status: status.to_string(),
      delivery_date: delivery_date
        .filter(|_| status == STATUS_DELIVERED)
        .map(str::to_string),
    };
    let request = self
      .authed(
        Method::PUT,
        &format!("/orders/{}/dealer/{}/status", order_id, dealer_id),
      )?
      .json(&body);
    self.send_status_update(request)
  }

  pub fn update_order_status(
    &self,
    order_id: i64,
    body: &StatusUpdate,
  ) -> Result<Option<Order>, ApiError> {
    let request = self
      .authed(Method::PUT, &format!("/orders/{}/status", order_id))?
      .json(body);
    self.send_status_update(request)
  }

  // 403 gets its own error, an empty answer is not an error.
  fn send_status_update(
    &self,
    request: reqwest::blocking::RequestBuilder,
  ) -> Result<Option<Order>, ApiError> {
    match self.send(request, "Error updating order status") {
      Ok(response) => read_optional_json(response),
      Err(ApiError::Status {
        status: StatusCode::FORBIDDEN,
        ..
      }) => Err(ApiError::Forbidden {
        context: "you are not allowed to update this order",
      }),
      Err(e) => Err(e),
    }
  }

  pub fn delete_client_by_id(&self, id: i64) -> Result<bool, ApiError> {
    self.send(
      self.request(Method::DELETE, &format!("/clients/{}", id)),
      "Error deleting client",
    )?;
    Ok(true)
  }

  pub fn get_orders_by_client(&self) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.authed(Method::GET, "/orders/client/orders")?,
      "Error fetching client orders",
    )
  }

  pub fn get_orders_by_client_id(&self, client_id: i64) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.request(Method::GET, &format!("/orders/client/{}", client_id)),
      "Error fetching client orders",
    )
  }

  pub fn get_orders_by_dealer_id(&self, dealer_id: i64) -> Result<Vec<Order>, ApiError> {
    let orders: Vec<Order> = self.send_json(
      self.request(Method::GET, &format!("/orders/dealer/{}", dealer_id)),
      "Error fetching dealer orders",
    )?;
    debug!("Received {} orders for dealer {}", orders.len(), dealer_id);
    Ok(orders)
  }

  pub fn get_orders_by_company_id(&self, company_id: i64) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.request(Method::GET, &format!("/orders/company/{}", company_id)),
      "Error fetching company orders",
    )
  }

  pub fn get_failed_deliveries_by_company_id(
    &self,
    company_id: i64,
  ) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.request(Method::GET, &format!("/orders/failed/company/{}", company_id)),
      "Error fetching failed deliveries",
    )
  }

  pub fn get_delivered_orders_by_company_id(
    &self,
    company_id: i64,
  ) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.request(
        Method::GET,
        &format!("/orders/delivered/company/{}", company_id),
      ),
      "Error fetching delivered orders",
    )
  }

  pub fn get_products_by_order_id(&self, order_id: i64) -> Result<Vec<Product>, ApiError> {
    self.send_json(
      self.authed(Method::GET, &format!("/orders/{}/products", order_id))?,
      "Error fetching order products",
    )
  }

  /// Creates `order` holding `product_ids`. The token is checked for expiry
  /// before anything is sent.
  pub fn create_order(&self, order: &Order, product_ids: &[i64]) -> Result<Order, ApiError> {
    let token = self.token()?;
    if token.is_expired_at(Utc::now())? {
      info!("Token expired, not sending order");
      return Err(ApiError::SessionExpired);
    }

    let query: Vec<(&str, i64)> = product_ids.iter().map(|id| ("productIds", *id)).collect();
    let response = self
      .authed(Method::POST, "/orders/create")?
      .query(&query)
      .json(order)
      .send()?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      let message = serde_json::from_str::<BackendMessage>(&body)
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));
      error!("create_order failed: {}", message);
      return Err(ApiError::Backend { status, message });
    }
    read_json(response)
  }

  /// The address comes back as plain text.
  pub fn get_client_address(&self) -> Result<String, ApiError> {
    let response = self.send(
      self.authed(Method::GET, "/orders/address")?,
      "Error fetching client address",
    )?;
    Ok(response.text()?)
  }

  pub fn get_top_spender(&self) -> Result<TopSpender, ApiError> {
    self.send_json(
      self.request(Method::GET, "/orders/top-spender"),
      "Error fetching top spender",
    )
  }

  pub fn mark_order_as_urgent(&self, order_id: i64) -> Result<(), ApiError> {
    self.send(
      self.authed(Method::PUT, &format!("/orders/{}/urgent", order_id))?,
      "Error marking order as urgent",
    )?;
    Ok(())
  }

  pub fn get_orders_by_dealer(&self) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.authed(Method::GET, "/orders/dealer/orders")?,
      "Error fetching dealer orders",
    )
  }

  /// `None` when the dealer has no active order (404 or an empty body).
  pub fn get_active_order_by_dealer(&self) -> Result<Option<Order>, ApiError> {
    match self.send(
      self.authed(Method::GET, "/orders/dealer/active-order")?,
      "Error fetching active dealer order",
    ) {
      Ok(response) => read_optional_json(response),
      Err(ApiError::Status {
        status: StatusCode::NOT_FOUND,
        ..
      }) => Ok(None),
      Err(e) => Err(e),
    }
  }

  pub fn get_orders_by_dealer_dto(&self) -> Result<Vec<OrderTotalProductsDto>, ApiError> {
    self.send_json(
      self.authed(Method::GET, "/orders/dealer/dto/orders")?,
      "Error fetching orders of the authenticated dealer",
    )
  }

  pub fn get_active_order_name_address_dto_by_dealer(
    &self,
  ) -> Result<OrderNameAddressDto, ApiError> {
    self.send_json(
      self.authed(Method::GET, "/orders/dealer/dto/active-order")?,
      "Error fetching active order of the dealer",
    )
  }

  pub fn get_failed_orders_by_client(&self) -> Result<Vec<Order>, ApiError> {
    self.send_json(
      self.authed(Method::GET, "/orders/client/failed")?,
      "Error fetching failed client orders",
    )
  }
}
