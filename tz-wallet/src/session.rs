//! In-memory session holding at most one unlocked account.

use tracing::{debug, warn};

use crate::client::TzClient;
use crate::error::{Result, WalletError};
use crate::keys::Keypair;
use crate::rpc::RpcGateway;
use crate::storage::CipherBlob;

/// Whether key material is currently held.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Locked,
    Unlocked(Keypair),
}

/// Unlock state plus the balance last fetched for the unlocked account.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    cached_balance: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `blob` with `password` and hold the resulting keypair.
    ///
    /// A bad password and a bad decrypted key both report
    /// [`WalletError::WrongPassword`]. The session is locked on any failure.
    pub fn unlock(&mut self, blob: &CipherBlob, password: &str) -> Result<&Keypair> {
        self.lock();

        let keypair = match blob
            .open(password)
            .and_then(|secret| Keypair::from_secret_key(&secret))
        {
            Ok(keypair) => keypair,
            Err(e) => {
                warn!("Unlock failed");
                debug!("Unlock failure cause: {}", e);
                return Err(match e {
                    e @ WalletError::UnsupportedBlobVersion(_) => e,
                    _ => WalletError::WrongPassword,
                });
            }
        };

        debug!("Unlocked {}", keypair.public_key_hash());
        self.state = SessionState::Unlocked(keypair);
        self.keypair()
    }

    /// Hold an already-derived keypair.
    pub fn unlock_with(&mut self, keypair: Keypair) {
        self.cached_balance = None;
        self.state = SessionState::Unlocked(keypair);
    }

    /// Drop the keypair and the cached balance.
    pub fn lock(&mut self) {
        self.state = SessionState::Locked;
        self.cached_balance = None;
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked(_))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The unlocked keypair, or [`WalletError::Locked`].
    pub fn keypair(&self) -> Result<&Keypair> {
        match &self.state {
            SessionState::Unlocked(keypair) => Ok(keypair),
            SessionState::Locked => Err(WalletError::Locked),
        }
    }

    /// A client for the unlocked account.
    pub fn client(&self, gateway: RpcGateway) -> Result<TzClient> {
        Ok(TzClient::new(gateway, self.keypair()?.clone()))
    }

    pub fn cached_balance(&self) -> Option<u64> {
        self.cached_balance
    }

    /// Fetch the unlocked account's balance and cache it.
    pub async fn refresh_balance(&mut self, gateway: &RpcGateway) -> Result<u64> {
        let balance = self.client(gateway.clone())?.balance(None).await?;
        self.cached_balance = Some(balance);
        Ok(balance)
    }
}
