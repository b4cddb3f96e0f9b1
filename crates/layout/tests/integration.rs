//! Integration tests for scheme resolution

#[cfg(test)]
mod tests {
    use wheelwright_errors::{Error, LayoutError};
    use wheelwright_layout::{Scheme, SchemeResolver};

    fn resolver() -> SchemeResolver {
        SchemeResolver::new("pkg-1.0.data", Scheme::Purelib)
    }

    #[test]
    fn test_root_paths_get_root_scheme() {
        let resolver = resolver();
        for path in ["pkg/__init__.py", "pkg/sub/mod.py", "top_level.txt"] {
            let decision = resolver.resolve(path).unwrap();
            assert_eq!(decision.path, path);
            assert_eq!(decision.scheme, Scheme::Purelib);
        }
    }

    #[test]
    fn test_platlib_root_scheme() {
        let resolver = SchemeResolver::new("ext-2.1.data", Scheme::Platlib);
        let decision = resolver.resolve("ext/native.so").unwrap();
        assert_eq!(decision.scheme, Scheme::Platlib);
    }

    #[test]
    fn test_data_dir_paths_get_scheme_segment() {
        let resolver = resolver();
        let cases = [
            ("pkg-1.0.data/scripts/run.sh", Scheme::Scripts),
            ("pkg-1.0.data/headers/pkg.h", Scheme::Headers),
            ("pkg-1.0.data/data/share/doc/readme", Scheme::Data),
            ("pkg-1.0.data/purelib/pkg/extra.py", Scheme::Purelib),
            ("pkg-1.0.data/platlib/pkg/fast.so", Scheme::Platlib),
        ];
        for (path, expected) in cases {
            let decision = resolver.resolve(path).unwrap();
            assert_eq!(decision.path, path);
            assert_eq!(decision.scheme, expected);
        }
    }

    #[test]
    fn test_nesting_depth_is_irrelevant() {
        let resolver = resolver();
        let decision = resolver
            .resolve("pkg-1.0.data/data/a/b/c/d/e/f/file.txt")
            .unwrap();
        assert_eq!(decision.scheme, Scheme::Data);
    }

    #[test]
    fn test_file_directly_under_data_dir() {
        // The final segment itself names the scheme when it sits directly
        // under the data directory.
        let resolver = resolver();
        let decision = resolver.resolve("pkg-1.0.data/scripts").unwrap();
        assert_eq!(decision.scheme, Scheme::Scripts);
    }

    #[test]
    fn test_invalid_scheme_segment() {
        let resolver = resolver();
        let err = resolver.resolve("pkg-1.0.data/misc/file.txt").unwrap_err();
        match err {
            Error::Layout(LayoutError::InvalidScheme { path, segment }) => {
                assert_eq!(path, "pkg-1.0.data/misc/file.txt");
                assert_eq!(segment, "misc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prefix_sharing_path_never_reaches_data_dir() {
        // Raw string prefix containment: this path is classified as
        // data-directory content but the walk up never finds the data
        // directory, so resolution fails instead of looping.
        let resolver = resolver();
        let err = resolver.resolve("pkg-1.0.data-extra/file.txt").unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn test_path_equal_to_data_dir_name() {
        let resolver = resolver();
        let err = resolver.resolve("pkg-1.0.data").unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn test_resolve_all_preserves_order_and_length() {
        let resolver = resolver();
        let paths = [
            "pkg/__init__.py",
            "pkg-1.0.data/scripts/run.sh",
            "pkg-1.0.data/headers/pkg.h",
        ];
        let decisions = resolver.resolve_all(paths).unwrap();
        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].path, "pkg/__init__.py");
        assert_eq!(decisions[0].scheme, Scheme::Purelib);
        assert_eq!(decisions[1].path, "pkg-1.0.data/scripts/run.sh");
        assert_eq!(decisions[1].scheme, Scheme::Scripts);
        assert_eq!(decisions[2].path, "pkg-1.0.data/headers/pkg.h");
        assert_eq!(decisions[2].scheme, Scheme::Headers);
    }

    #[test]
    fn test_resolve_all_propagates_first_error() {
        let resolver = resolver();
        let paths = ["pkg/__init__.py", "pkg-1.0.data/junk/x"];
        assert!(resolver.resolve_all(paths).is_err());
    }

    #[test]
    fn test_scheme_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Scheme::Headers).unwrap(), "\"headers\"");
        let parsed: Scheme = serde_json::from_str("\"platlib\"").unwrap();
        assert_eq!(parsed, Scheme::Platlib);
    }
}
