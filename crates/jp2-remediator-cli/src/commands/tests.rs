mod clap {
    use std::path::Path;

    use clap::Parser;
    use jp2_remediator::ValidatorOptions;

    use super::super::{Args, LocatorKind, Subcommands};

    #[test]
    fn basic_file() {
        let args =
            Args::try_parse_from(["jp2-remediator", "file", "input.jp2", "-o", "output.jp2"])
                .unwrap();
        let Subcommands::File(file_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(args.globals.verbose, 0);
        assert_eq!(file_args.input, Path::new("input.jp2"));
        assert_eq!(file_args.output.as_deref(), Some(Path::new("output.jp2")));
        assert_eq!(file_args.remediate.locator, LocatorKind::Search);
        assert!(file_args.remediate.stamp.is_none());
    }

    #[test]
    fn dir_defaults() {
        let args = Args::try_parse_from(["jp2-remediator", "dir", "scans"]).unwrap();
        let Subcommands::Dir(dir_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(dir_args.input_dir, Path::new("scans"));
        assert!(dir_args.output_dir.is_none());
        assert_eq!(dir_args.extension, "jp2");

        let args = Args::try_parse_from([
            "jp2-remediator",
            "-d",
            "scans",
            "--output-dir",
            "fixed",
            "--extension",
            "JPF",
            "--locator",
            "boxes",
        ])
        .unwrap();
        let Subcommands::Dir(dir_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(dir_args.output_dir.as_deref(), Some(Path::new("fixed")));
        assert_eq!(dir_args.extension, "JPF");
        assert_eq!(dir_args.remediate.locator, LocatorKind::Boxes);
    }

    #[test]
    fn bucket() {
        assert!(Args::try_parse_from(["jp2-remediator", "bucket", "images"]).is_err());

        let args = Args::try_parse_from([
            "jp2-remediator",
            "bucket",
            "images",
            "--prefix",
            "scans/",
            "--output-prefix",
            "fixed",
            "--store-root",
            "/srv/store",
            "--stamp",
            "20240315",
        ])
        .unwrap();
        let Subcommands::Bucket(bucket_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(bucket_args.bucket, "images");
        assert_eq!(bucket_args.prefix, "scans/");
        assert!(bucket_args.output_bucket.is_none());
        assert_eq!(bucket_args.output_prefix, "fixed");
        assert_eq!(bucket_args.store_root, Path::new("/srv/store"));
        assert_eq!(
            bucket_args.remediate.stamp.as_ref().map(|s| s.as_str()),
            Some("20240315")
        );
    }

    #[test]
    fn invalid_stamp() {
        assert!(Args::try_parse_from([
            "jp2-remediator",
            "file",
            "input.jp2",
            "--stamp",
            "2024-03-15"
        ])
        .is_err());
    }

    #[test]
    fn flag_style_inspect() {
        let args = Args::try_parse_from(["jp2-remediator", "-I", "input.jp2"]).unwrap();
        let Subcommands::Inspect(inspect_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(args.globals.verbose, 0);
        assert_eq!(inspect_args.input, Path::new("input.jp2"));
    }

    #[test]
    fn inspect_validator_flags() {
        let args = Args::try_parse_from([
            "jp2-remediator",
            "inspect",
            "input.jp2",
            "--null-xml",
            "--no-packet-markers",
        ])
        .unwrap();
        let Subcommands::Inspect(inspect_args) = args.subcommand else {
            panic!();
        };
        let options = inspect_args.validator.options();
        assert!(options.null_xml);
        assert!(!options.packet_markers);

        let args = Args::try_parse_from(["jp2-remediator", "file", "input.jp2", "--null-xml"])
            .unwrap();
        let Subcommands::File(file_args) = args.subcommand else {
            panic!();
        };
        assert_eq!(
            file_args.remediate.validator.options(),
            ValidatorOptions {
                null_xml: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn subcommand_required() {
        assert!(Args::try_parse_from(["jp2-remediator", "input.jp2"]).is_err());
    }

    #[test]
    fn verbose() {
        let args = Args::try_parse_from(["jp2-remediator", "file", "input.jp2", "-v"]).unwrap();
        assert_eq!(args.globals.verbose, 1);

        let args =
            Args::try_parse_from(["jp2-remediator", "--verbose", "file", "input.jp2"]).unwrap();
        assert_eq!(args.globals.verbose, 1);

        let args = Args::try_parse_from(["jp2-remediator", "-Iv", "input.jp2"]).unwrap();
        assert_eq!(args.globals.verbose, 1);

        let args = Args::try_parse_from(["jp2-remediator", "-vv", "file", "input.jp2"]).unwrap();
        assert_eq!(args.globals.verbose, 2);
    }

    #[test]
    fn quiet() {
        let args = Args::try_parse_from(["jp2-remediator", "file", "input.jp2", "-q"]).unwrap();
        assert!(args.globals.quiet);

        let args = Args::try_parse_from(["jp2-remediator", "-Iq", "input.jp2"]).unwrap();
        assert!(args.globals.quiet);
    }

    #[test]
    fn verbose_quiet_conflicts() {
        assert!(Args::try_parse_from(["jp2-remediator", "file", "input.jp2", "-q", "-v"]).is_err());
        assert!(Args::try_parse_from(["jp2-remediator", "-Ivvq", "input.jp2"]).is_err());
    }
}
