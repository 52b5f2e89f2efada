// Geographic endpoints. Coordinates may be absent; projecting them onto a
// drawing surface happens in `oltnms-core`.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{MapOlt, MapOnu};

impl ApiClient {
    /// `GET /maps/olts`
    pub async fn map_olts(&self) -> Result<Vec<MapOlt>, Error> {
        self.get("maps/olts").await
    }

    /// `GET /maps/onus`
    pub async fn map_onus(&self) -> Result<Vec<MapOnu>, Error> {
        self.get("maps/onus").await
    }
}
