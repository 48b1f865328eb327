pub mod mock;
pub mod remote;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::AdapterBox;
use crate::domain::models::AdapterName;

pub struct AdapterManager {}

impl AdapterManager {
    pub fn get(name: AdapterName) -> Result<AdapterBox> {
        if name == AdapterName::Mock {
            return Ok(Box::<mock::Mock>::default());
        }

        if name == AdapterName::Remote {
            return Ok(Box::<remote::Remote>::default());
        }

        bail!(format!("No adapter implemented for {name}"))
    }
}
