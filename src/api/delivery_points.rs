use super::{ApiClient, ApiError};
use crate::models::NearestDeliveryPointDto;
use reqwest::Method;

impl ApiClient {
  /// The five delivery points closest to a company, nearest first.
  pub fn get_nearest_delivery_points(
    &self,
    company_id: i64,
  ) -> Result<Vec<NearestDeliveryPointDto>, ApiError> {
    self.send_json(
      self.request(Method::GET, &format!("/companies/nearest/{}", company_id)),
      "Error fetching nearest delivery points",
    )
  }
}
