//! Client and employee records available to the form generator.
//!
//! Records live in memory and are seeded from a JSON file at startup.

pub mod routes;

use anyhow::Context;
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::forms::common::digits_only;
use crate::forms::{Client, Employee};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Brak wolnego identyfikatora klienta")]
    IdsExhausted,
}

#[derive(Debug, Default, Deserialize)]
struct DirectorySeed {
    #[serde(default)]
    clients: Vec<Client>,
    #[serde(default)]
    employees: Vec<Employee>,
}

#[derive(Debug, Default)]
pub struct Directory {
    clients: RwLock<Vec<Client>>,
    employees: RwLock<Vec<Employee>>,
}

impl Directory {
    pub fn new(clients: Vec<Client>, employees: Vec<Employee>) -> Self {
        Self {
            clients: RwLock::new(clients),
            employees: RwLock::new(employees),
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let seed: DirectorySeed =
            serde_json::from_str(json).context("directory seed is not valid JSON")?;
        Ok(Self::new(seed.clients, seed.employees))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read directory seed {}", path.display()))?;
        let directory = Self::from_json(&json)
            .with_context(|| format!("failed to load directory seed {}", path.display()))?;
        log::info!(
            "Directory loaded from {}: {} clients, {} employees",
            path.display(),
            directory.clients.read().len(),
            directory.employees.read().len()
        );
        Ok(directory)
    }

    pub fn clients(&self) -> Vec<Client> {
        self.clients.read().clone()
    }

    pub fn client(&self, id: &str) -> Option<Client> {
        self.clients
            .read()
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .cloned()
    }

    /// Case-insensitive match on name, company or NIP.
    pub fn search_clients(&self, query: &str) -> Vec<Client> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.clients();
        }
        let query_digits = digits_only(&query);
        self.clients
            .read()
            .iter()
            .filter(|c| {
                c.full_name().to_lowercase().contains(&query)
                    || c.company_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&query))
                    || (!query_digits.is_empty()
                        && c.nip
                            .as_deref()
                            .is_some_and(|nip| digits_only(nip).contains(&query_digits)))
            })
            .cloned()
            .collect()
    }

    /// Store a client, assigning the next numeric id.
    pub fn add_client(&self, mut client: Client) -> Result<Client, DirectoryError> {
        let mut clients = self.clients.write();
        let next_id = clients
            .iter()
            .filter_map(|c| c.id.as_deref()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(DirectoryError::IdsExhausted)?;
        client.id = Some(next_id.to_string());
        clients.push(client.clone());
        Ok(client)
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.employees.read().clone()
    }

    pub fn employee(&self, id: &str) -> Option<Employee> {
        self.employees
            .read()
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
    }
}
