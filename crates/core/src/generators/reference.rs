//! Provider and department reference tables. Generated once per run, independent
//! of the patient population.

use super::{staff_name, years_before};
use crate::catalog::departments::{
    CATALOG, LOCATIONS, PROVIDER_CREDENTIALS, PROVIDER_SPECIALTIES,
};
use crate::config::GenerationConfig;
use crate::records::{DepartmentRecord, Provider};
use crate::sampling::{SamplingContext, Weighted};
use chrono::TimeDelta;
use pedsynth_types::IdSequence;

pub const PROVIDER_ID_PREFIX: &str = "PROV";
pub const PROVIDER_ID_WIDTH: usize = 6;
pub const DEPARTMENT_ID_PREFIX: &str = "DEPT";
pub const DEPARTMENT_ID_WIDTH: usize = 3;

const PROVIDERS_PER_SPECIALTY: std::ops::RangeInclusive<usize> = 10..=20;
const PROVIDER_STATUSES: [Weighted<&str>; 2] = [("Active", 0.75), ("Inactive", 0.25)];
const NPI_DIGITS: usize = 10;

pub fn generate_providers(cfg: &GenerationConfig) -> Vec<Provider> {
    let mut ctx = SamplingContext::derive(cfg.seed(), "providers");
    let mut ids = IdSequence::new(PROVIDER_ID_PREFIX, PROVIDER_ID_WIDTH);

    let latest = years_before(cfg.as_of(), 1).date();
    let earliest = years_before(cfg.as_of(), 20).date();
    let span_days = (latest - earliest).num_days();

    let mut providers = Vec::new();
    for specialty in PROVIDER_SPECIALTIES {
        let count = ctx.usize_in(PROVIDERS_PER_SPECIALTY);
        for _ in 0..count {
            let (first_name, last_name) = staff_name(&mut ctx);
            providers.push(Provider {
                provider_id: ids.next_id(),
                npi: ctx.digits(NPI_DIGITS),
                first_name,
                last_name,
                specialty,
                department: specialty,
                credentials: *ctx.choose(&PROVIDER_CREDENTIALS),
                status: *ctx.weighted(&PROVIDER_STATUSES),
                hire_date: earliest + TimeDelta::days(ctx.int_in(0..=span_days)),
            });
        }
    }
    tracing::debug!(count = providers.len(), "generated providers");
    providers
}

pub fn generate_departments(cfg: &GenerationConfig) -> Vec<DepartmentRecord> {
    let mut ctx = SamplingContext::derive(cfg.seed(), "departments");
    CATALOG
        .iter()
        .enumerate()
        .map(|(position, department)| DepartmentRecord {
            department_id: IdSequence::format(
                DEPARTMENT_ID_PREFIX,
                DEPARTMENT_ID_WIDTH,
                position as u64 + 1,
            ),
            department_name: department.name(),
            department_code: department.code(),
            service_line: department.service_line(),
            location: *ctx.choose(&LOCATIONS),
            status: "Active",
        })
        .collect()
}
