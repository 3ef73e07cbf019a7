//! The TCP front end: accept loop, per-session command loop, and PASV data
//! channels.
//!
//! One spawned task per connection — sessions run concurrently against the
//! shared store while commands within a session stay sequential. A session
//! error tears down that connection only, never the listener.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use galley_config::ServerConfig;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::auth::Authenticator;
use crate::error::FtpError;
use crate::gateway::{Gateway, ListEntry};
use crate::reply::Reply;
use crate::session::SessionContext;

/// The protocol listener. Generic over the login seam so tests can plug in
/// their own authenticator.
pub struct FtpServer<A: Authenticator> {
    listener: TcpListener,
    gateway: Arc<Gateway>,
    auth: Arc<A>,
    advertised_addr: String,
}

impl<A: Authenticator + 'static> FtpServer<A> {
    /// Bind the control listener.
    ///
    /// # Errors
    ///
    /// Returns `FtpError::Io` if the address cannot be bound.
    pub async fn bind(config: &ServerConfig, gateway: Gateway, auth: A) -> Result<Self, FtpError> {
        let listener = TcpListener::bind((config.bind_addr.as_str(), config.port)).await?;
        info!(addr = %listener.local_addr()?, "control listener bound");
        Ok(Self {
            listener,
            gateway: Arc::new(gateway),
            auth: Arc::new(auth),
            advertised_addr: config.advertised_addr().to_string(),
        })
    }

    /// The bound control address (useful with port 0 in tests).
    ///
    /// # Errors
    ///
    /// Returns `FtpError::Io` if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr, FtpError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    ///
    /// # Errors
    ///
    /// Returns `FtpError::Io` only when accepting itself fails; session
    /// failures are logged and contained.
    pub async fn run(self) -> Result<(), FtpError> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!(%peer, "client connected");
            let gateway = Arc::clone(&self.gateway);
            let auth = Arc::clone(&self.auth);
            let advertised = self.advertised_addr.clone();
            tokio::spawn(async move {
                if let Err(err) = handle_session(stream, gateway, auth, advertised).await {
                    warn!(%peer, %err, "session ended with error");
                }
                debug!(%peer, "client disconnected");
            });
        }
    }
}

/// Connection-local command loop state.
struct Conn<A: Authenticator> {
    gateway: Arc<Gateway>,
    auth: Arc<A>,
    advertised_addr: String,
    local_ip: IpAddr,
    writer: OwnedWriteHalf,
    pending_user: Option<String>,
    session: Option<SessionContext>,
    passive: Option<TcpListener>,
}

async fn handle_session<A: Authenticator>(
    stream: TcpStream,
    gateway: Arc<Gateway>,
    auth: Arc<A>,
    advertised_addr: String,
) -> Result<(), FtpError> {
    let local_ip = stream.local_addr()?.ip();
    let (read_half, writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let mut conn = Conn {
        gateway,
        auth,
        advertised_addr,
        local_ip,
        writer,
        pending_user: None,
        session: None,
        passive: None,
    };
    conn.send(&Reply::greeting()).await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        let (verb, arg) = match line.split_once(' ') {
            Some((verb, arg)) => (verb.to_ascii_uppercase(), arg.trim()),
            None => (line.to_ascii_uppercase(), ""),
        };
        debug!(%verb, %arg, "command");

        if verb == "QUIT" {
            conn.send(&Reply::new(221, "Goodbye.")).await?;
            break;
        }
        conn.dispatch(&verb, arg).await?;
    }
    Ok(())
}

impl<A: Authenticator> Conn<A> {
    async fn send(&mut self, reply: &Reply) -> Result<(), FtpError> {
        self.writer.write_all(reply.render().as_bytes()).await?;
        Ok(())
    }

    /// Every command lands here and produces exactly one final reply.
    async fn dispatch(&mut self, verb: &str, arg: &str) -> Result<(), FtpError> {
        match verb {
            "USER" => {
                self.pending_user = Some(arg.to_string());
                self.send(&Reply::need_password()).await
            }
            "PASS" => self.login(arg).await,
            "SYST" => self.send(&Reply::new(215, "UNIX Type: L8")).await,
            "FEAT" => self.send(&Reply::new(211, "End.")).await,
            "TYPE" => self.send(&Reply::ok(format!("Type set to {arg}."))).await,
            "NOOP" => self.send(&Reply::ok("Ok.")).await,
            _ if self.session.is_none() => self.send(&Reply::not_logged_in()).await,
            "PWD" => {
                let cwd = self.session.as_ref().map(SessionContext::cwd).unwrap_or_default();
                self.send(&Reply::cwd_is(&cwd)).await
            }
            "CWD" => {
                let Some(mut session) = self.session.take() else {
                    return self.send(&Reply::not_logged_in()).await;
                };
                let reply = self.gateway.cwd(&mut session, arg).await;
                self.session = Some(session);
                self.send(&reply).await
            }
            "MKD" => {
                let reply = match &self.session {
                    Some(session) => self.gateway.mkd(session, arg).await,
                    None => Reply::not_logged_in(),
                };
                self.send(&reply).await
            }
            "PASV" => self.open_passive().await,
            "LIST" => self.list(arg).await,
            "STOR" => self.stor(arg).await,
            _ => self.send(&Reply::not_implemented()).await,
        }
    }

    async fn login(&mut self, password: &str) -> Result<(), FtpError> {
        let Some(username) = self.pending_user.take() else {
            return self.send(&Reply::new(503, "Send USER first.")).await;
        };
        match self.auth.authenticate(&username, password).await {
            Ok(Some(user)) => {
                info!(user = %user.name, "logged in");
                let reply = Reply::logged_in(&user.name);
                self.session = Some(SessionContext::new(user));
                self.send(&reply).await
            }
            Ok(None) => self.send(&Reply::new(530, "Login incorrect.")).await,
            Err(err) => {
                warn!(%err, "authentication backend failed");
                self.send(&Reply::local_error()).await
            }
        }
    }

    async fn open_passive(&mut self) -> Result<(), FtpError> {
        let listener = TcpListener::bind((self.local_ip, 0)).await?;
        let port = listener.local_addr()?.port();
        let reply = Reply::new(227, passive_text(&self.advertised_addr, port));
        self.passive = Some(listener);
        self.send(&reply).await
    }

    async fn list(&mut self, arg: &str) -> Result<(), FtpError> {
        let Some(session) = &self.session else {
            return self.send(&Reply::not_logged_in()).await;
        };
        // Tolerate `LIST -l`-style flags: they address the cwd.
        let path_arg = if arg.starts_with('-') { "" } else { arg };
        let entries = match self.gateway.list(session, path_arg).await {
            Ok(entries) => entries,
            Err(reply) => return self.send(&reply).await,
        };
        let Some(listener) = self.passive.take() else {
            return self.send(&Reply::new(425, "Use PASV first.")).await;
        };

        self.send(&Reply::new(150, "Here comes the directory listing."))
            .await?;
        let (mut data, _) = listener.accept().await?;
        for entry in &entries {
            data.write_all(render_entry(entry).as_bytes()).await?;
        }
        data.shutdown().await?;
        self.send(&Reply::new(226, "Directory send ok.")).await
    }

    async fn stor(&mut self, arg: &str) -> Result<(), FtpError> {
        if self.session.is_none() {
            return self.send(&Reply::not_logged_in()).await;
        }
        if arg.is_empty() {
            return self.send(&Reply::rejected("STOR needs a path.")).await;
        }
        let Some(listener) = self.passive.take() else {
            return self.send(&Reply::new(425, "Use PASV first.")).await;
        };

        self.send(&Reply::new(150, "Ok to send data.")).await?;
        let (mut data, _) = listener.accept().await?;
        let mut payload = Vec::new();
        data.read_to_end(&mut payload).await?;
        drop(data);

        let reply = match &self.session {
            Some(session) => self.gateway.stor(session, arg, &payload).await,
            None => Reply::not_logged_in(),
        };
        self.send(&reply).await
    }
}

/// `227` reply text: comma-separated IPv4 octets plus the port split into
/// high and low bytes.
fn passive_text(advertised: &str, port: u16) -> String {
    let octets = advertised
        .parse::<std::net::Ipv4Addr>()
        .unwrap_or(std::net::Ipv4Addr::LOCALHOST)
        .octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{}).",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port / 256,
        port % 256
    )
}

fn render_entry(entry: &ListEntry) -> String {
    let flag = if entry.is_dir { 'd' } else { '-' };
    format!(
        "{flag}rw-r--r--   1 galley   galley          0 Jan  1 00:00 {}\r\n",
        entry.name
    )
}
