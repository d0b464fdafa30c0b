use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::debug;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_TITLE: &str = "general.app_title";

    pub const SUMMARY: &str = "summary.sentence";
    pub const OPTIMAL_MARKER: &str = "chart.optimal_marker";
    pub const CHART_TITLE: &str = "chart.title";
    pub const CHART_X_AXIS: &str = "chart.x_axis";
    pub const CHART_Y_AXIS: &str = "chart.y_axis";
    pub const SERIES_REPAIR: &str = "chart.series_repair";
    pub const SERIES_PREVENTION: &str = "chart.series_prevention";
    pub const SERIES_CUMULATIVE: &str = "chart.series_cumulative";

    pub const INPUT_HEADING: &str = "input.heading";
    pub const INPUT_COST_PER_REPAIR: &str = "input.cost_per_repair";
    pub const INPUT_NON_AVAILABILITY: &str = "input.non_availability_cost_per_day";
    pub const INPUT_PREDICTED: &str = "input.predicted_repairs_per_year";
    pub const INPUT_UNPREDICTED: &str = "input.unpredicted_repairs_per_year";
    pub const INPUT_NEW_CAR: &str = "input.cost_of_new_car";
    pub const INPUT_CARS: &str = "input.number_of_cars";
    pub const INPUT_LIFETIME: &str = "input.expected_lifetime_years";
    pub const INPUT_RESET: &str = "input.reset";

    pub const PROMPT_DEFAULT_HINT: &str = "prompt.default_hint";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_BELOW_MINIMUM: &str = "error.below_minimum";

    pub const TABLE_YEAR: &str = "table.year";
    pub const TABLE_REPAIR: &str = "table.total_repair";
    pub const TABLE_PREVENTION: &str = "table.preventive";
    pub const TABLE_CUMULATIVE: &str = "table.cumulative";
}

/// 지원 언어.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        if code.to_lowercase().starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en-us",
            Language::Ko => "ko-kr",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    /// 언어 코드에 따라 내장 언어팩으로 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let strings = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang.as_code()))
            .unwrap_or_default();
        let fallback = built_in_pack(Language::En.as_code()).unwrap_or_default();
        debug!(lang = lang.as_code(), entries = strings.len(), "translator ready");
        Self {
            lang,
            strings,
            fallback,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    /// 번역을 가져온다. 없으면 영어 내장 문자열, 그것도 없으면 키 자체를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역 문자열.
    pub fn t_with(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// `{key}` 형태의 자리표시자를 값으로 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(code) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(code);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: 섹션/키 = "value" 로 구성된 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    let (base, _) = lang.split_once(['-', '_'])?;
    try_load(base)
}

/// 중첩 테이블을 점(.)으로 이은 플랫 맵으로 바꾼다.
pub fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang {
        "en-us" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        _ => None,
    }
}
