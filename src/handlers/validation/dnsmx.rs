use super::CheckOutcome;
use async_trait::async_trait;
use log::warn;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    proto::rr::Name,
};

/// Looks up the mail exchange hosts of a domain.
///
/// Implementations never fail outright: every problem is folded into the
/// returned [`CheckOutcome`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MxResolver: Send + Sync {
    /// `Passed` carries the exchange host names in answer order, without the
    /// trailing root dot.
    async fn lookup_mx(&self, domain: &str) -> CheckOutcome<Vec<String>>;
}

/// MX lookups through the system DNS resolver.
///
/// MX records only; unlike plain deliverability checks there is no A/AAAA
/// fallback, because the SMTP probe needs an exchange host.
pub struct DnsMxResolver {
    resolver: TokioAsyncResolver,
}

impl DnsMxResolver {
    /// Builds a resolver from `/etc/resolv.conf` (or the platform
    /// equivalent), falling back to the library defaults if that fails.
    pub fn from_system_conf() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!("System DNS configuration unavailable ({e}), using default resolvers");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });

        Self { resolver }
    }
}

#[async_trait]
impl MxResolver for DnsMxResolver {
    async fn lookup_mx(&self, domain: &str) -> CheckOutcome<Vec<String>> {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => {
                let hosts = lookup.iter().map(|mx| exchange_host(mx.exchange())).collect();
                classify_exchanges(domain, hosts)
            }
            Err(error) => classify_resolve_error(&error),
        }
    }
}

/// An empty answer, or one made only of null MX records (`MX 0 .`), means
/// the domain accepts no mail.
fn classify_exchanges(domain: &str, hosts: Vec<String>) -> CheckOutcome<Vec<String>> {
    let answered = !hosts.is_empty();
    let exchanges: Vec<String> = hosts.into_iter().filter(|host| !host.is_empty()).collect();

    if !exchanges.is_empty() {
        CheckOutcome::Passed(exchanges)
    } else if answered {
        CheckOutcome::Failed(format!("{domain} publishes a null MX record"))
    } else {
        CheckOutcome::Failed(format!("{domain} returned an empty MX answer"))
    }
}

fn exchange_host(name: &Name) -> String {
    name.to_utf8().trim_end_matches('.').to_string()
}

/// NXDOMAIN and NOERROR-without-MX are genuine negatives. Every other
/// response code (SERVFAIL, REFUSED, ...) and every non-DNS error (timeouts,
/// I/O) means the lookup could not be performed.
fn classify_resolve_error(error: &ResolveError) -> CheckOutcome<Vec<String>> {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound {
            response_code: ResponseCode::NXDomain | ResponseCode::NoError,
            ..
        } => CheckOutcome::Failed(error.to_string()),
        _ => CheckOutcome::Unavailable(error.to_string()),
    }
}
