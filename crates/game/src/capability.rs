use std::str::FromStr;

/// The kind of client the game runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Firefox,
    Chrome,
    Opera,
    Safari,
    CocoonJs,
    /// Internet Explorer with its document mode.
    InternetExplorer(u32),
    /// The desktop build.
    Native,
    Other,
}

impl ClientKind {
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Firefox
                | Self::Chrome
                | Self::Safari
                | Self::CocoonJs
                | Self::InternetExplorer(11)
                | Self::Native
        )
    }
}

impl FromStr for ClientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Ok(match lower.as_str() {
            "firefox" => Self::Firefox,
            "chrome" => Self::Chrome,
            "opera" => Self::Opera,
            "safari" => Self::Safari,
            "cocoonjs" => Self::CocoonJs,
            "native" => Self::Native,
            "other" => Self::Other,
            _ => match lower.strip_prefix("ie") {
                Some(mode) => Self::InternetExplorer(
                    mode.parse().map_err(|_| format!("bad IE version in {s:?}"))?,
                ),
                None => return Err(format!("unknown client {s:?}")),
            },
        })
    }
}

/// What the capability check knows about the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientProfile {
    pub kind: ClientKind,
    /// A graphics API is present at all.
    pub graphics_api: bool,
    /// A rendering context could actually be created.
    pub context_available: bool,
}

impl ClientProfile {
    /// Profile of the desktop build after probing for a GPU adapter.
    pub fn native(graphics_api: bool, context_available: bool) -> Self {
        Self {
            kind: ClientKind::Native,
            graphics_api,
            context_available,
        }
    }
}

/// Why the client cannot run the game. Each variant carries the page the
/// user is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error(
        "Sorry, but your browser is not supported.\nGoo works best in Google Chrome or Mozilla Firefox.\nYou will be redirected to a download page."
    )]
    UnsupportedClient,
    #[error(
        "Sorry, but we could not find a WebGL rendering context.\nYou will be redirected to a troubleshooting page."
    )]
    NoGraphicsContext,
    #[error("You seem to have WebGL disabled, redirecting to a helpful page.")]
    GraphicsDisabled,
}

impl CapabilityError {
    pub fn redirect_url(self) -> &'static str {
        match self {
            Self::UnsupportedClient => "https://www.google.com/chrome",
            Self::NoGraphicsContext => "http://get.webgl.org/troubleshooting",
            Self::GraphicsDisabled => "http://app.goocreate.com/webgl-disabled",
        }
    }
}

/// Decide whether the client can run the game. Checks run in order and the
/// first failure wins.
pub fn check_client(profile: &ClientProfile) -> Result<(), CapabilityError> {
    let verdict = if !profile.kind.is_supported() {
        Err(CapabilityError::UnsupportedClient)
    } else if !profile.graphics_api {
        Err(CapabilityError::NoGraphicsContext)
    } else if !profile.context_available {
        Err(CapabilityError::GraphicsDisabled)
    } else {
        Ok(())
    };
    match &verdict {
        Ok(()) => tracing::debug!(kind = ?profile.kind, "client supported"),
        Err(e) => tracing::warn!(kind = ?profile.kind, redirect = e.redirect_url(), "client rejected"),
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(kind: ClientKind) -> ClientProfile {
        ClientProfile {
            kind,
            graphics_api: true,
            context_available: true,
        }
    }

    #[test]
    fn supported_clients() {
        for kind in [
            ClientKind::Firefox,
            ClientKind::Chrome,
            ClientKind::Safari,
            ClientKind::CocoonJs,
            ClientKind::InternetExplorer(11),
            ClientKind::Native,
        ] {
            assert_eq!(check_client(&profile(kind)), Ok(()), "{kind:?}");
        }
    }

    #[test]
    fn unsupported_client_wins_over_missing_graphics() {
        let p = ClientProfile {
            kind: ClientKind::Opera,
            graphics_api: false,
            context_available: false,
        };
        let err = check_client(&p).unwrap_err();
        assert_eq!(err, CapabilityError::UnsupportedClient);
        assert_eq!(err.redirect_url(), "https://www.google.com/chrome");
        assert!(err.to_string().starts_with("Sorry, but your browser is not supported."));

        assert_eq!(
            check_client(&profile(ClientKind::InternetExplorer(10))),
            Err(CapabilityError::UnsupportedClient)
        );
    }

    #[test]
    fn graphics_failures() {
        let none = ClientProfile::native(false, false);
        assert_eq!(check_client(&none), Err(CapabilityError::NoGraphicsContext));
        assert_eq!(
            CapabilityError::NoGraphicsContext.redirect_url(),
            "http://get.webgl.org/troubleshooting"
        );

        let disabled = ClientProfile::native(true, false);
        assert_eq!(check_client(&disabled), Err(CapabilityError::GraphicsDisabled));
        assert_eq!(
            CapabilityError::GraphicsDisabled.redirect_url(),
            "http://app.goocreate.com/webgl-disabled"
        );
    }

    #[test]
    fn parses_client_names() {
        assert_eq!("Chrome".parse::<ClientKind>(), Ok(ClientKind::Chrome));
        assert_eq!("ie11".parse::<ClientKind>(), Ok(ClientKind::InternetExplorer(11)));
        assert!("ie".parse::<ClientKind>().is_err());
        assert!("netscape".parse::<ClientKind>().is_err());
    }
}
