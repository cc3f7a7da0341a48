// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库, 支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言; 不支持的语言代码返回 false 且保持当前语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        tracing::warn!(locale = %locale, "不支持的语言代码,保持当前语言");
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）, 占位符格式 %{name}
///
/// # 示例
/// ```no_run
/// use fleet_induction::i18n::t_with_args;
/// let msg = t_with_args("readiness.alert_ready", &[("vehicle", "TS-01"), ("score", "91.25")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |msg, (k, v)| {
        msg.replace(&format!("%{{{}}}", k), v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为全局状态，i18n 测试串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(set_locale("en"));
        assert_eq!(current_locale(), "en");

        assert!(!set_locale("fr"));
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("zh-CN");
    }

    #[test]
    fn test_readiness_alert_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let args = [("vehicle", "TS-11"), ("score", "91.25")];

        set_locale("zh-CN");
        let msg = t_with_args("readiness.alert_ready", &args);
        assert!(msg.contains("TS-11"));
        assert!(msg.contains("91.25"));
        assert!(msg.contains("可恢复运营"));

        set_locale("en");
        let msg = t_with_args("readiness.alert_dropout", &args);
        assert!(msg.contains("TS-11"));
        assert!(msg.contains("must return to maintenance"));
        assert!(!msg.contains("%{"));

        set_locale("zh-CN");
    }
}
