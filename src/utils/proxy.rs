//! 系统代理配置工具
//!
//! 读取系统代理设置（macOS scutil、Windows 注册表），供 HTTP 客户端使用
//! 已通过 HTTP(S)_PROXY 环境变量配置时由 reqwest 自行处理，不再读取系统设置

use tracing::info;
#[cfg(target_os = "windows")]
use tracing::warn;

/// 系统代理地址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxySettings {
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }

    /// 将代理配置到 HTTP 客户端
    pub fn apply(&self, mut builder: reqwest::ClientBuilder) -> reqwest::Result<reqwest::ClientBuilder> {
        if let Some(url) = &self.http {
            builder = builder.proxy(reqwest::Proxy::http(url)?);
            info!("使用系统 HTTP 代理: {}", url);
        }
        if let Some(url) = &self.https {
            builder = builder.proxy(reqwest::Proxy::https(url)?);
            info!("使用系统 HTTPS 代理: {}", url);
        }
        Ok(builder)
    }
}

fn with_scheme(addr: &str) -> String {
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    }
}

/// 解析 `scutil --proxy` 的输出
pub fn parse_scutil_proxy(output: &str) -> ProxySettings {
    let value = |key: &str| {
        output
            .lines()
            .map(str::trim)
            .find(|l| l.split(':').next().map(str::trim) == Some(key))
            .and_then(|l| l.split_once(':'))
            .map(|(_, v)| v.trim().to_string())
    };

    let proxy = |enable: &str, host: &str, port: &str| {
        let enabled = value(enable).and_then(|v| v.parse::<i32>().ok()) == Some(1);
        if !enabled {
            return None;
        }
        match (value(host), value(port)) {
            (Some(host), Some(port)) => Some(format!("http://{}:{}", host, port)),
            _ => None,
        }
    };

    ProxySettings {
        http: proxy("HTTPEnable", "HTTPProxy", "HTTPPort"),
        https: proxy("HTTPSEnable", "HTTPSProxy", "HTTPSPort"),
    }
}

/// 解析 Windows 注册表中的 ProxyServer 值
///
/// 格式可能是：
/// 1. "host:port" (所有协议使用同一代理)
/// 2. "http=host:port;https=host:port" (不同协议使用不同代理)
pub fn parse_windows_proxy_server(proxy_server: &str) -> ProxySettings {
    let mut settings = ProxySettings::default();

    if proxy_server.contains('=') {
        for part in proxy_server.split(';') {
            if let Some((protocol, addr)) = part.split_once('=') {
                let addr = addr.trim();
                match protocol.trim().to_lowercase().as_str() {
                    "http" => settings.http = Some(with_scheme(addr)),
                    "https" => settings.https = Some(with_scheme(addr)),
                    _ => {}
                }
            }
        }
    } else if !proxy_server.trim().is_empty() {
        let url = with_scheme(proxy_server.trim());
        settings.http = Some(url.clone());
        settings.https = Some(url);
    }

    settings
}

fn env_proxy_configured() -> bool {
    ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]
        .iter()
        .any(|name| std::env::var_os(name).is_some())
}

#[cfg(target_os = "macos")]
fn read_system_proxy() -> ProxySettings {
    use std::process::Command;

    match Command::new("scutil").arg("--proxy").output() {
        Ok(output) if output.status.success() => {
            parse_scutil_proxy(&String::from_utf8_lossy(&output.stdout))
        }
        _ => ProxySettings::default(),
    }
}

#[cfg(target_os = "windows")]
fn read_system_proxy() -> ProxySettings {
    use winreg::enums::*;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let Ok(internet_settings) =
        hkcu.open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Internet Settings")
    else {
        warn!("无法读取 Windows 代理设置");
        return ProxySettings::default();
    };

    if internet_settings.get_value::<u32, _>("ProxyEnable").ok() != Some(1) {
        info!("Windows 系统代理未启用");
        return ProxySettings::default();
    }

    internet_settings
        .get_value::<String, _>("ProxyServer")
        .map(|server| parse_windows_proxy_server(&server))
        .unwrap_or_default()
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn read_system_proxy() -> ProxySettings {
    ProxySettings::default()
}

/// 获取系统代理（环境变量已配置时返回空）
pub fn detect_system_proxy() -> ProxySettings {
    if env_proxy_configured() {
        return ProxySettings::default();
    }
    read_system_proxy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scutil_proxy() {
        let output = r#"<dictionary> {
  HTTPEnable : 1
  HTTPPort : 7890
  HTTPProxy : 127.0.0.1
  HTTPSEnable : 0
  HTTPSPort : 7890
  HTTPSProxy : 127.0.0.1
}"#;
        let settings = parse_scutil_proxy(output);
        assert_eq!(settings.http.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(settings.https, None);
    }

    #[test]
    fn test_parse_windows_single_proxy() {
        let settings = parse_windows_proxy_server("proxy.local:8080");
        assert_eq!(settings.http.as_deref(), Some("http://proxy.local:8080"));
        assert_eq!(settings.https.as_deref(), Some("http://proxy.local:8080"));
    }

    #[test]
    fn test_parse_windows_per_protocol_proxy() {
        let settings = parse_windows_proxy_server("http=a:1;https=http://b:2;ftp=c:3");
        assert_eq!(settings.http.as_deref(), Some("http://a:1"));
        assert_eq!(settings.https.as_deref(), Some("http://b:2"));
    }

    #[test]
    fn test_empty_settings_leave_builder_usable() {
        let settings = parse_windows_proxy_server("");
        assert!(settings.is_empty());
        let builder = settings.apply(reqwest::Client::builder()).unwrap();
        assert!(builder.build().is_ok());
    }
}
