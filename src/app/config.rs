use std::path::Path;

use crate::config::ResolvedConfig;
use crate::duration::format_interval;

pub fn config_output(config_path: &Path, config: &ResolvedConfig) -> serde_json::Value {
    serde_json::json!({
        "config_file": config_path.display().to_string(),
        "data_directory": config.data_dir.display().to_string(),
        "scan": {
            "auto_scan_enabled": config.scan.auto_scan_enabled,
            "interval": format_interval(config.scan.interval),
            "sms_enabled": config.scan.sms_enabled,
            "email_enabled": config.scan.email_enabled,
            "auto_import_enabled": config.scan.auto_import_enabled,
            "keywords": config.scan.keywords,
            "sms_export": config.scan.sms_export.as_ref().map(|p| p.display().to_string()),
            "mail_export_dir": config.mail_export_dir().display().to_string(),
        }
    })
}
