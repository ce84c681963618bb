//! Fixed set of configured presses and their live status.

use std::sync::Arc;
use tracing::warn;

use crate::config;
use crate::http::AppError;
use crate::model::{
    round1, Device, DevicePerformance, DeviceScope, DeviceStatus, DeviceStatusDetail, JobFilter,
};
use crate::upstream::DeviceSource;

use super::jobs::JobStore;

pub struct DeviceRegistry {
    devices: Vec<config::Device>,
    source: Arc<dyn DeviceSource>,
    store: Arc<JobStore>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<config::Device>, source: Arc<dyn DeviceSource>, store: Arc<JobStore>) -> Self {
        Self {
            devices,
            source,
            store,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&config::Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&config::Device, AppError> {
        self.get(id).ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Ids covered by a scope. Unknown single devices are rejected.
    pub fn resolve(&self, scope: &DeviceScope) -> Result<Vec<String>, AppError> {
        match scope {
            DeviceScope::All => Ok(self.ids().map(str::to_string).collect()),
            DeviceScope::Device(id) => Ok(vec![self.require(id)?.id.clone()]),
        }
    }

    /// Every device with its current status. A press that cannot be reached
    /// is listed as offline.
    pub async fn list(&self) -> Vec<Device> {
        let mut out = Vec::with_capacity(self.devices.len());
        for device in &self.devices {
            let status = match self.source.press_snapshot(&device.id).await {
                Ok(snapshot) => snapshot.state.status(),
                Err(err) => {
                    warn!(
                        component = "registry",
                        event = "snapshot_failed",
                        device_id = %device.id,
                        error = %err,
                        "press unreachable, reporting offline"
                    );
                    DeviceStatus::Offline
                }
            };
            out.push(Device {
                id: device.id.clone(),
                name: device.name.clone(),
                model: device.model.clone(),
                status,
            });
        }
        out
    }

    pub async fn status(&self, id: &str) -> Result<DeviceStatusDetail, AppError> {
        let device = self.require(id)?;
        let snapshot = self.source.press_snapshot(id).await?;
        let totals = self
            .store
            .totals(&JobFilter::for_device(DeviceScope::Device(id.to_string())));

        Ok(DeviceStatusDetail {
            id: device.id.clone(),
            name: device.name.clone(),
            model: device.model.clone(),
            status: snapshot.state.status(),
            press_state: snapshot.state,
            current_job_name: snapshot.current_job_name,
            total_jobs: totals.total_jobs,
            printed_jobs: totals.printed_jobs,
            total_impressions: totals.total_impressions,
            last_marker: self.store.last_marker(id),
            last_sync: self.store.last_sync(id),
        })
    }

    pub fn performance(&self, id: &str, filter: &JobFilter) -> Result<DevicePerformance, AppError> {
        let device = self.require(id)?;
        let mut filter = filter.clone();
        filter.device = DeviceScope::Device(id.to_string());
        let totals = self.store.totals(&filter);

        let avg = if totals.total_jobs == 0 {
            0.0
        } else {
            round1(totals.total_impressions as f64 / totals.total_jobs as f64)
        };
        Ok(DevicePerformance {
            id: device.id.clone(),
            name: device.name.clone(),
            total_jobs: totals.total_jobs,
            printed_jobs: totals.printed_jobs,
            aborted_jobs: totals.aborted_jobs,
            total_impressions: totals.total_impressions,
            total_sheets: totals.total_sheets,
            success_rate: crate::model::percentage(totals.printed_jobs, totals.total_jobs),
            avg_impressions_per_job: avg,
        })
    }
}
