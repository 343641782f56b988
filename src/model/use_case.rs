use std::fmt;
use std::str::FromStr;

/// Charging purpose category of a candidate grid connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UseCase {
    Home,
    Work,
    Public,
    /// High-power charging hub.
    Hpc,
}

impl UseCase {
    /// All use-cases in the order the candidate pool is resized.
    pub const ALL: [UseCase; 4] = [UseCase::Hpc, UseCase::Public, UseCase::Home, UseCase::Work];

    pub fn as_str(self) -> &'static str {
        match self {
            UseCase::Home => "home",
            UseCase::Work => "work",
            UseCase::Public => "public",
            UseCase::Hpc => "hpc",
        }
    }

    /// Use-case of a private charging destination.
    ///
    /// Returns `None` for destinations that have no private charging point.
    pub fn for_private_destination(destination: &str) -> Option<Self> {
        match destination {
            "0_work" => Some(UseCase::Work),
            "6_home" => Some(UseCase::Home),
            _ => None,
        }
    }

    /// Use-case of a public charging destination.
    ///
    /// Every trip purpose charges at an ordinary public point except the
    /// charging hub, which is served by high-power points.
    pub fn for_public_destination(destination: &str) -> Option<Self> {
        match destination {
            "0_work" | "1_business" | "2_school" | "3_shopping" | "4_private/ridesharing"
            | "5_leisure" | "6_home" => Some(UseCase::Public),
            "7_charging_hub" => Some(UseCase::Hpc),
            _ => None,
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = String;

    /// Accepts both plain names and the `uc1`..`uc4` tags used in
    /// grid-connection file names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" | "uc3" => Ok(UseCase::Home),
            "work" | "uc4" => Ok(UseCase::Work),
            "public" | "uc2" => Ok(UseCase::Public),
            "hpc" | "uc1" => Ok(UseCase::Hpc),
            other => Err(format!("unknown use-case \"{other}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_tags_map_to_use_cases() {
        assert_eq!("uc1".parse::<UseCase>(), Ok(UseCase::Hpc));
        assert_eq!("uc2".parse::<UseCase>(), Ok(UseCase::Public));
        assert_eq!("uc3".parse::<UseCase>(), Ok(UseCase::Home));
        assert_eq!("uc4".parse::<UseCase>(), Ok(UseCase::Work));
        assert!("uc5".parse::<UseCase>().is_err());
    }

    #[test]
    fn private_destinations() {
        assert_eq!(UseCase::for_private_destination("0_work"), Some(UseCase::Work));
        assert_eq!(UseCase::for_private_destination("6_home"), Some(UseCase::Home));
        assert_eq!(UseCase::for_private_destination("3_shopping"), None);
    }

    #[test]
    fn public_destinations_collapse_to_public_and_hpc() {
        for d in ["0_work", "1_business", "2_school", "3_shopping", "5_leisure", "6_home"] {
            assert_eq!(UseCase::for_public_destination(d), Some(UseCase::Public));
        }
        assert_eq!(
            UseCase::for_public_destination("7_charging_hub"),
            Some(UseCase::Hpc)
        );
        assert_eq!(UseCase::for_public_destination("8_unknown"), None);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for uc in UseCase::ALL {
            assert_eq!(uc.to_string().parse::<UseCase>(), Ok(uc));
        }
    }
}
