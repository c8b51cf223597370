use url::Url;

pub const DEFAULT_HOST: &str = "https://api.stowage.dev";
pub const DEFAULT_WEB_APP_HOST: &str = "https://app.stowage.dev";
pub const DEFAULT_SIA_HOST: &str = "https://sia.stowage.dev";

const DEFAULT_EDGE_GATEWAYS: [&str; 4] = [
    "https://edge-1.stowage.dev",
    "https://edge-2.stowage.dev",
    "https://edge-ap.stowage.dev",
    "https://edge-eu.stowage.dev",
];

/// Base hosts for the REST, web-app and object-storage surfaces, plus the
/// content-network edge gateways used when building replication links.
///
/// Injected into every operation group at construction; there is no
/// global default state to mutate.
#[derive(Debug, Clone)]
pub struct Hosts {
    /// Main REST API host.
    pub api: Url,
    /// Web-app host serving user settings, file access and storage routes.
    pub web_app: Url,
    /// Object-storage (Sia) metadata host.
    pub sia: Url,
    /// Edge gateways serving content-addressed (IPFS) downloads.
    pub edge_gateways: Vec<Url>,
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            api: Url::parse(DEFAULT_HOST).expect("static host URL"),
            web_app: Url::parse(DEFAULT_WEB_APP_HOST).expect("static host URL"),
            sia: Url::parse(DEFAULT_SIA_HOST).expect("static host URL"),
            edge_gateways: DEFAULT_EDGE_GATEWAYS
                .iter()
                .map(|gateway| Url::parse(gateway).expect("static gateway URL"))
                .collect(),
        }
    }
}

impl Hosts {
    /// Point every surface at one host. Handy for tests and self-hosted
    /// deployments that run the whole stack behind a single origin.
    pub fn single(origin: Url) -> Self {
        Self {
            api: origin.clone(),
            web_app: origin.clone(),
            sia: origin.clone(),
            edge_gateways: vec![origin],
        }
    }
}
