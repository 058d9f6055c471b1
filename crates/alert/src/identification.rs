#![forbid(unsafe_code)]

use nix::sys::socket::SockaddrStorage;
use std::ffi::OsString;
use std::net::{IpAddr, SocketAddrV4, SocketAddrV6};
use tracing::warn;

/// Who raised the alert, as reported in the `identification` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identification {
    pub user: String,
    pub hostname: String,
    /// Empty when the host has no usable address.
    pub ip: String,
    pub os: String,
}

pub trait HostProbe: Send + Sync {
    fn identify(&self) -> Identification;
}

/// Identifies the running host from the environment and the kernel.
///
/// Every lookup is best-effort: a failure leaves the field empty and is
/// logged, it never prevents the alert from being built.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    os: String,
}

impl SystemProbe {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl HostProbe for SystemProbe {
    fn identify(&self) -> Identification {
        Identification {
            user: user(),
            hostname: hostname(),
            ip: first_ip_address()
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            os: self.os.clone(),
        }
    }
}

fn user() -> String {
    user_name(std::env::var_os("USER"))
}

/// Unset is empty; bytes that are not UTF-8 are replaced, not dropped.
fn user_name(value: Option<OsString>) -> String {
    value
        .map(|user| user.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => {
            warn!(%err, "failed to read hostname");
            String::new()
        }
    }
}

/// First IPv4 or IPv6 interface address that is not a loopback address.
pub fn first_ip_address() -> Option<IpAddr> {
    let addrs = match nix::ifaddrs::getifaddrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            warn!(%err, "failed to enumerate interface addresses");
            return None;
        }
    };

    addrs
        .filter_map(|ifaddr| ifaddr.address.as_ref().and_then(ip_of))
        .find(|ip| !ip.is_loopback())
}

fn ip_of(addr: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(sin) = addr.as_sockaddr_in() {
        return Some(IpAddr::V4(*SocketAddrV4::from(*sin).ip()));
    }
    if let Some(sin6) = addr.as_sockaddr_in6() {
        return Some(IpAddr::V6(*SocketAddrV6::from(*sin6).ip()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn system_probe_reports_configured_os() {
        let identification = SystemProbe::new("GNU/Linux").identify();
        assert_eq!(identification.os, "GNU/Linux");
        assert!(!identification.ip.starts_with("127."));
        assert_ne!(identification.ip, "::1");
    }

    #[test]
    fn user_name_survives_non_utf8() {
        use std::os::unix::ffi::OsStringExt;

        assert_eq!(user_name(None), "");
        assert_eq!(user_name(Some("jdoe".into())), "jdoe");
        let raw = OsString::from_vec(b"j\xffdoe".to_vec());
        assert_eq!(user_name(Some(raw)), "j\u{fffd}doe");
    }

    #[test]
    fn socket_addresses_yield_their_ip() {
        let v4 = SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 20), 0);
        assert_eq!(
            ip_of(&SockaddrStorage::from(v4)),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
        );

        let ip6 = Ipv6Addr::new(0xfe80, 0, 0, 0, 0x1, 0x2, 0x3, 0x4);
        let v6 = SocketAddrV6::new(ip6, 0, 0, 2);
        assert_eq!(ip_of(&SockaddrStorage::from(v6)), Some(IpAddr::V6(ip6)));
    }

    #[test]
    fn first_ip_is_never_loopback() {
        if let Some(ip) = first_ip_address() {
            assert!(!ip.is_loopback());
        }
    }
}
