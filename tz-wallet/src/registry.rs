//! Account Registry
//!
//! Named accounts, each a sealed secret key, kept in a string-keyed JSON
//! store. Layout of the store:
//!
//! - `_`: map of account name to `{name, cipherdata}`
//! - `__`: `{name, cipherdata}` of the account sealed under the access code
//! - `v`: layout version
//!
//! Opening a registry whose stored version is older than
//! [`REGISTRY_VERSION`] (or missing) clears the accounts and the access code.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::keys::{generate_mnemonic, Keypair};
use crate::storage::CipherBlob;

/// Current store layout version
pub const REGISTRY_VERSION: f64 = 0.11;

const ACCOUNTS_KEY: &str = "_";
const ACCESS_CODE_KEY: &str = "__";
const VERSION_KEY: &str = "v";

/// String-keyed store of JSON values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Load the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let json = fs::read_to_string(&path)
                .map_err(|e| WalletError::Storage(format!("failed to read store: {}", e)))?;
            serde_json::from_str(&json)
                .map_err(|e| WalletError::Storage(format!("failed to parse store: {}", e)))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| WalletError::Storage(e.to_string()))?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(json.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, json)?;
        }

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// A named, sealed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub cipherdata: CipherBlob,
}

/// Named accounts on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct AccountRegistry<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AccountRegistry<S> {
    /// Wrap `store`, migrating its layout first if needed.
    pub fn open(store: S) -> Result<Self> {
        let mut registry = Self { store };
        registry.migrate()?;
        Ok(registry)
    }

    /// Reset an outdated store. Returns whether anything changed.
    pub fn migrate(&mut self) -> Result<bool> {
        let stored = self
            .store
            .get(VERSION_KEY)?
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        if stored >= REGISTRY_VERSION {
            return Ok(false);
        }

        info!(
            "Migrating account store from version {} to {}",
            stored, REGISTRY_VERSION
        );
        self.store
            .set(ACCOUNTS_KEY, Value::Object(Default::default()))?;
        self.store.remove(ACCESS_CODE_KEY)?;
        self.store.set(VERSION_KEY, Value::from(REGISTRY_VERSION))?;
        Ok(true)
    }

    /// All accounts, keyed and ordered by name.
    pub fn accounts(&self) -> Result<BTreeMap<String, AccountRecord>> {
        match self.store.get(ACCOUNTS_KEY)? {
            None | Some(Value::Null) => Ok(BTreeMap::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| WalletError::Storage(format!("corrupt account list: {}", e))),
        }
    }

    pub fn account(&self, name: &str) -> Result<AccountRecord> {
        self.accounts()?
            .remove(name)
            .ok_or_else(|| WalletError::Account(format!("no account named '{}'", name)))
    }

    /// Check that `name` is usable for a new account.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(WalletError::Account(
                "Please input your account name".to_string(),
            ));
        }
        if self.accounts()?.contains_key(name) {
            return Err(WalletError::Account(
                "This account name has already been used".to_string(),
            ));
        }
        Ok(())
    }

    /// Store a sealed account under a new name.
    pub fn add_account(&mut self, name: &str, cipherdata: CipherBlob) -> Result<()> {
        self.validate_name(name)?;

        let mut accounts = self.accounts()?;
        accounts.insert(
            name.to_string(),
            AccountRecord {
                name: name.to_string(),
                cipherdata,
            },
        );
        self.save_accounts(&accounts)?;
        debug!("Added account '{}'", name);
        Ok(())
    }

    /// Seal `keypair` under `password` and store it as `name`.
    pub fn import_account(&mut self, name: &str, keypair: &Keypair, password: &str) -> Result<()> {
        validate_password(password)?;
        self.validate_name(name)?;
        let blob = CipherBlob::seal(&keypair.secret_key_bytes()[..], password)?;
        self.add_account(name, blob)
    }

    /// Restore an account from a mnemonic phrase and store it as `name`.
    ///
    /// `passphrase` is the BIP39 passphrase the phrase was created with and
    /// may be empty. `password` only seals the stored key.
    pub fn import_mnemonic(
        &mut self,
        name: &str,
        phrase: &str,
        passphrase: &str,
        password: &str,
    ) -> Result<Keypair> {
        validate_password(password)?;
        self.validate_name(name)?;
        let keypair = Keypair::from_mnemonic(phrase, passphrase)?;
        self.import_account(name, &keypair, password)?;
        Ok(keypair)
    }

    /// Create a fresh account from a new mnemonic.
    ///
    /// The password doubles as the mnemonic passphrase and as the sealing
    /// secret. The phrase is returned for the user to write down.
    pub fn create_account(
        &mut self,
        name: &str,
        password: &str,
    ) -> Result<(Zeroizing<String>, Keypair)> {
        validate_password(password)?;
        self.validate_name(name)?;

        let mnemonic = generate_mnemonic();
        let keypair = Keypair::from_mnemonic(&mnemonic, password)?;
        self.import_account(name, &keypair, password)?;
        Ok((mnemonic, keypair))
    }

    pub fn remove_account(&mut self, name: &str) -> Result<()> {
        let mut accounts = self.accounts()?;
        if accounts.remove(name).is_none() {
            return Err(WalletError::Account(format!("no account named '{}'", name)));
        }
        self.save_accounts(&accounts)
    }

    /// The account sealed under the access code, if one was generated.
    pub fn access_code(&self) -> Result<Option<AccountRecord>> {
        match self.store.get(ACCESS_CODE_KEY)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| WalletError::Storage(format!("corrupt access code record: {}", e))),
        }
    }

    /// Sealed keys of `name` under the access code.
    ///
    /// Fails if no access code was generated or it belongs to another account.
    pub fn access_code_blob(&self, name: &str) -> Result<CipherBlob> {
        let record = self.access_code()?.ok_or_else(|| {
            WalletError::Account("no access code has been generated".to_string())
        })?;
        if record.name != name {
            return Err(WalletError::Account(format!(
                "the access code belongs to account '{}', not '{}'",
                record.name, name
            )));
        }
        Ok(record.cipherdata)
    }

    /// Replace the access code with `cipherdata`, owned by account `name`.
    pub fn set_access_code(&mut self, name: &str, cipherdata: CipherBlob) -> Result<()> {
        self.account(name)?;
        let record = AccountRecord {
            name: name.to_string(),
            cipherdata,
        };
        let value =
            serde_json::to_value(&record).map_err(|e| WalletError::Storage(e.to_string()))?;
        self.store.set(ACCESS_CODE_KEY, value)?;
        debug!("Access code set for account '{}'", name);
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save_accounts(&mut self, accounts: &BTreeMap<String, AccountRecord>) -> Result<()> {
        let value =
            serde_json::to_value(accounts).map_err(|e| WalletError::Storage(e.to_string()))?;
        self.store.set(ACCOUNTS_KEY, value)
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(WalletError::Account(
            "Please input your password".to_string(),
        ));
    }
    Ok(())
}
