//! Origin-site descriptors for tracked pointers.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// A source location that called into the registry.
///
/// Misuse reports name the site of the offending call, so a stray
/// `release` can be found without a debugger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
    function: Option<Cow<'static, str>>,
}

impl CallSite {
    /// A call made at an explicit site.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: Option<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function,
        }
    }

    /// The caller's source location.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            function: None,
        }
    }

    /// Source file of the call.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Source line of the call.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Enclosing function, when the caller supplied one.
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(function) = &self.function {
            write!(f, " :: {function}()")?;
        }
        Ok(())
    }
}

/// Where a tracked pointer was registered, plus a human name.
///
/// Rust callers capture the site with [`Descriptor::caller`], which reads
/// the `#[track_caller]` location. The C surface builds descriptors from
/// the `file`, `line`, and `func` arguments it receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    site: CallSite,
    name: Cow<'static, str>,
}

impl Descriptor {
    /// Describe a registration made at an explicit site.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: Option<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            site: CallSite::new(file, line, function),
            name: name.into(),
        }
    }

    /// Describe a registration made at the caller's source location.
    #[track_caller]
    pub fn caller(name: impl Into<Cow<'static, str>>) -> Self {
        Self::at(CallSite::caller(), name)
    }

    /// Describe a registration made at `site`.
    pub fn at(site: CallSite, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            site,
            name: name.into(),
        }
    }

    /// The registration site.
    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// Source file of the registration.
    pub fn file(&self) -> &str {
        self.site.file()
    }

    /// Source line of the registration.
    pub fn line(&self) -> u32 {
        self.site.line()
    }

    /// Enclosing function, when the caller supplied one.
    pub fn function(&self) -> Option<&str> {
        self.site.function()
    }

    /// Human name of the tracked value.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.site, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_captures_this_file() {
        let d = Descriptor::caller("value");
        assert!(d.file().ends_with("descriptor.rs"));
        assert!(d.line() > 0);
        assert_eq!(d.function(), None);
        assert_eq!(d.name(), "value");
    }

    #[test]
    fn display_with_function() {
        let d = Descriptor::new("node.c", 42, Some("nodeEvent".into()), "outputImage");
        assert_eq!(d.to_string(), "node.c:42 :: nodeEvent() :: outputImage");
    }

    #[test]
    fn call_site_display() {
        assert_eq!(CallSite::new("node.c", 3, None).to_string(), "node.c:3");
        assert_eq!(
            CallSite::new("node.c", 3, Some("fire".into())).to_string(),
            "node.c:3 :: fire()"
        );
        assert!(CallSite::caller().file().ends_with("descriptor.rs"));
    }

    #[test]
    fn display_without_function() {
        let d = Descriptor::new("lib.rs", 7, None, "list");
        assert_eq!(d.to_string(), "lib.rs:7 :: list");
    }
}
