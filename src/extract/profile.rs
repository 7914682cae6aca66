//! Employer profile field extraction
//!
//! Every field resolves independently to a value or `None`. A profile page
//! with nothing recognisable still yields a record carrying its source URL
//! and timestamp.

use crate::config::ProfileConfig;
use crate::extract::tree::{find_labeled_value, joined_text, LabelLayout};
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Named fields of an extracted profile, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    CollectedAt,
    SourceUrl,
    Name,
    Phone,
    Prefecture,
    Address,
    Industry,
    RegistrationNumber,
    Representative,
    Capital,
    Revenue,
    EmployeeCount,
    FoundedOn,
    Business,
    Homepage,
}

impl ProfileField {
    /// All fields in column order
    pub const ALL: [ProfileField; 15] = [
        Self::CollectedAt,
        Self::SourceUrl,
        Self::Name,
        Self::Phone,
        Self::Prefecture,
        Self::Address,
        Self::Industry,
        Self::RegistrationNumber,
        Self::Representative,
        Self::Capital,
        Self::Revenue,
        Self::EmployeeCount,
        Self::FoundedOn,
        Self::Business,
        Self::Homepage,
    ];

    /// Column header used in the exported table
    pub fn header(self) -> &'static str {
        match self {
            Self::CollectedAt => "取得日時",
            Self::SourceUrl => "取得URL",
            Self::Name => "名称",
            Self::Phone => "電話番号",
            Self::Prefecture => "都道府県",
            Self::Address => "住所",
            Self::Industry => "業種",
            Self::RegistrationNumber => "法人番号",
            Self::Representative => "代表者",
            Self::Capital => "資本金",
            Self::Revenue => "売上",
            Self::EmployeeCount => "従業員数",
            Self::FoundedOn => "設立日",
            Self::Business => "事業内容",
            Self::Homepage => "HP",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.header() == header)
    }
}

/// Structured facts scraped from one employer profile page
///
/// `None` means "not found"; it only becomes an empty cell at export time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedProfile {
    pub collected_at: String,
    pub source_url: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub prefecture: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub registration_number: Option<String>,
    pub representative: Option<String>,
    pub capital: Option<String>,
    pub revenue: Option<String>,
    pub employee_count: Option<String>,
    pub founded_on: Option<String>,
    pub business: Option<String>,
    pub homepage: Option<String>,
}

impl ExtractedProfile {
    /// Value of a field, if present
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::CollectedAt => Some(self.collected_at.as_str()),
            ProfileField::SourceUrl => Some(self.source_url.as_str()),
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Phone => self.phone.as_deref(),
            ProfileField::Prefecture => self.prefecture.as_deref(),
            ProfileField::Address => self.address.as_deref(),
            ProfileField::Industry => self.industry.as_deref(),
            ProfileField::RegistrationNumber => self.registration_number.as_deref(),
            ProfileField::Representative => self.representative.as_deref(),
            ProfileField::Capital => self.capital.as_deref(),
            ProfileField::Revenue => self.revenue.as_deref(),
            ProfileField::EmployeeCount => self.employee_count.as_deref(),
            ProfileField::FoundedOn => self.founded_on.as_deref(),
            ProfileField::Business => self.business.as_deref(),
            ProfileField::Homepage => self.homepage.as_deref(),
        }
    }
}

// Three-character prefectures are spelled out so the two-character catch-all
// cannot cut them short.
const PREFECTURE_PATTERN: &str = "(北海道|東京都|京都府|大阪府|神奈川県|和歌山県|鹿児島県|..県)";

const ADDRESS_LABEL: &str = "所在地";
const FOUNDED_LABEL: &str = "設立年";
const CAPITAL_LABEL: &str = "資本金";
const REPRESENTATIVE_LABEL: &str = "代表者名";
const EMPLOYEES_LABEL: &str = "従業員数";
const BUSINESS_LABEL: &str = "事業内容";
const HOMEPAGE_LABEL: &str = "URL";

/// Compiled extraction rules for profile pages
#[derive(Debug, Clone)]
pub struct ProfileRules {
    scripts: Selector,
    analytics_marker: String,
    analytics_name: Regex,
    name_suffix: String,
    name_selectors: Vec<Selector>,
    prefecture: Regex,
    layout: LabelLayout,
}

impl ProfileRules {
    /// Compiles the profile configuration
    pub fn compile(config: &ProfileConfig) -> Result<Self, ConfigError> {
        let scripts = Selector::parse("script")
            .map_err(|e| ConfigError::InvalidPattern(format!("Invalid script selector: {}", e)))?;

        let key_pattern = format!(r#""{}"\s*:\s*"([^"]*)""#, regex::escape(&config.analytics_name_key));
        let analytics_name = Regex::new(&key_pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("Invalid analytics key: {}", e)))?;

        let name_selectors = config
            .name_selectors
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| {
                    ConfigError::InvalidPattern(format!("Invalid name selector '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let prefecture = Regex::new(PREFECTURE_PATTERN)
            .map_err(|e| ConfigError::InvalidPattern(format!("Invalid prefecture pattern: {}", e)))?;

        Ok(Self {
            scripts,
            analytics_marker: config.analytics_marker.clone(),
            analytics_name,
            name_suffix: config.name_suffix.clone(),
            name_selectors,
            prefecture,
            layout: LabelLayout::default(),
        })
    }

    /// Employer name from the first script block carrying the analytics marker
    ///
    /// Only that one block is inspected. The configured suffix is stripped.
    pub fn analytics_name(&self, document: &Html) -> Option<String> {
        let payload = document
            .select(&self.scripts)
            .map(|script| script.text().collect::<String>())
            .find(|text| text.contains(&self.analytics_marker))?;

        let raw = self.analytics_name.captures(&payload)?.get(1)?.as_str().trim();
        let name = raw.strip_suffix(self.name_suffix.as_str()).unwrap_or(raw).trim();

        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// First non-empty text among the fallback name selectors
    pub fn selector_name(&self, document: &Html) -> Option<String> {
        self.name_selectors
            .iter()
            .filter_map(|selector| document.select(selector).next())
            .find_map(|element| joined_text(&element, ""))
    }

    /// Prefecture named at the start of an address, if any
    pub fn prefecture_of(&self, address: Option<&str>) -> Option<String> {
        self.prefecture
            .find(address?)
            .map(|m| m.as_str().to_string())
    }

    /// Value paired with a visible label
    pub fn labeled(&self, document: &Html, label: &str, prefer_link: bool) -> Option<String> {
        let nodes = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap);
        find_labeled_value(nodes, |text| text.contains(label), &self.layout, prefer_link)
    }
}

/// Extracts a profile, stamping it with the current local time
pub fn extract_profile(document: &Html, source_url: &str, rules: &ProfileRules) -> ExtractedProfile {
    let collected_at = chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    extract_profile_at(document, source_url, rules, collected_at)
}

/// Extracts a profile with an explicit collection timestamp
pub fn extract_profile_at(
    document: &Html,
    source_url: &str,
    rules: &ProfileRules,
    collected_at: String,
) -> ExtractedProfile {
    let name = rules
        .analytics_name(document)
        .or_else(|| rules.selector_name(document));

    let address = rules.labeled(document, ADDRESS_LABEL, false);
    let prefecture = rules.prefecture_of(address.as_deref());

    ExtractedProfile {
        collected_at,
        source_url: source_url.to_string(),
        name,
        prefecture,
        address,
        founded_on: rules.labeled(document, FOUNDED_LABEL, false),
        capital: rules.labeled(document, CAPITAL_LABEL, false),
        representative: rules.labeled(document, REPRESENTATIVE_LABEL, false),
        employee_count: rules.labeled(document, EMPLOYEES_LABEL, false),
        business: rules.labeled(document, BUSINESS_LABEL, false),
        homepage: rules.labeled(document, HOMEPAGE_LABEL, true),
        // not published on this site's profile pages
        phone: None,
        industry: None,
        registration_number: None,
        revenue: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ProfileRules {
        ProfileRules::compile(&ProfileConfig::default()).unwrap()
    }

    fn extract(html: &str) -> ExtractedProfile {
        extract_profile_at(
            &Html::parse_document(html),
            "https://www.baitoru.com/cjlist1/",
            &rules(),
            "2024-05-01T09:30:00".to_string(),
        )
    }

    const FULL_PROFILE: &str = r#"<html><head>
        <script>window.dataLayer = [];</script>
        <script>
            var analyticsData = {
                "prop60" : "kanto",
                "prop61" : "株式会社サンプル 飲食事業部のバイト/アルバイト/パートの求人情報",
            };
        </script>
        </head><body>
        <h1>ページ見出し</h1>
        <dl>
            <dt><span>所在地</span></dt><dd><p>千葉県千葉市中央区1-1</p></dd>
            <dt><span>設立年</span></dt><dd>1985年</dd>
            <dt><span>資本金</span></dt><dd>1,000万円</dd>
            <dt><span>代表者名</span></dt><dd>山田 太郎</dd>
            <dt><span>従業員数</span></dt><dd>120名</dd>
            <dt><span>事業内容</span></dt><dd><p>飲食店の運営</p><p>ケータリング</p></dd>
            <dt><span>URL</span></dt><dd><a href="https://sample.example.jp/">https://sample.example.jp/</a></dd>
        </dl>
    </body></html>"#;

    #[test]
    fn test_full_profile() {
        let profile = extract(FULL_PROFILE);

        assert_eq!(profile.collected_at, "2024-05-01T09:30:00");
        assert_eq!(profile.source_url, "https://www.baitoru.com/cjlist1/");
        assert_eq!(profile.name.as_deref(), Some("株式会社サンプル 飲食事業部"));
        assert_eq!(profile.address.as_deref(), Some("千葉県千葉市中央区1-1"));
        assert_eq!(profile.prefecture.as_deref(), Some("千葉県"));
        assert_eq!(profile.founded_on.as_deref(), Some("1985年"));
        assert_eq!(profile.capital.as_deref(), Some("1,000万円"));
        assert_eq!(profile.representative.as_deref(), Some("山田 太郎"));
        assert_eq!(profile.employee_count.as_deref(), Some("120名"));
        assert_eq!(profile.business.as_deref(), Some("飲食店の運営 ケータリング"));
        assert_eq!(profile.homepage.as_deref(), Some("https://sample.example.jp/"));
    }

    #[test]
    fn test_fields_without_source_always_absent() {
        let profile = extract(FULL_PROFILE);
        assert_eq!(profile.phone, None);
        assert_eq!(profile.industry, None);
        assert_eq!(profile.registration_number, None);
        assert_eq!(profile.revenue, None);
    }

    #[test]
    fn test_name_falls_back_to_selector() {
        let html = r#"<html><head><script>var other = 1;</script></head>
            <body><h1>  株式会社フォールバック  </h1></body></html>"#;
        assert_eq!(extract(html).name.as_deref(), Some("株式会社フォールバック"));
    }

    #[test]
    fn test_empty_analytics_name_falls_back() {
        let html = r#"<html><head><script>var analyticsData = {"prop61" : ""};</script></head>
            <body><h1>見出し</h1></body></html>"#;
        assert_eq!(extract(html).name.as_deref(), Some("見出し"));
    }

    #[test]
    fn test_only_first_analytics_block_is_read() {
        let html = r#"<html><head>
            <script>var analyticsData = {"prop1": "x"};</script>
            <script>var analyticsData = {"prop61": "二番目"};</script>
            </head><body></body></html>"#;
        assert_eq!(extract(html).name, None);
    }

    #[test]
    fn test_empty_page_yields_partial_record() {
        let profile = extract("<html><body></body></html>");
        assert_eq!(profile.source_url, "https://www.baitoru.com/cjlist1/");
        assert_eq!(profile.name, None);
        assert_eq!(profile.address, None);
        assert_eq!(profile.prefecture, None);
        assert_eq!(profile.homepage, None);
    }

    #[test]
    fn test_prefecture_variants() {
        let rules = rules();
        assert_eq!(rules.prefecture_of(Some("東京都新宿区")).as_deref(), Some("東京都"));
        assert_eq!(rules.prefecture_of(Some("北海道札幌市")).as_deref(), Some("北海道"));
        assert_eq!(rules.prefecture_of(Some("大阪府大阪市")).as_deref(), Some("大阪府"));
        assert_eq!(rules.prefecture_of(Some("神奈川県横浜市")).as_deref(), Some("神奈川県"));
        assert_eq!(rules.prefecture_of(Some("〒260-0013 千葉県千葉市")).as_deref(), Some("千葉県"));
        assert_eq!(rules.prefecture_of(Some("所在地不明")), None);
        assert_eq!(rules.prefecture_of(None), None);
    }

    #[test]
    fn test_headers_round_trip() {
        for field in ProfileField::ALL {
            assert_eq!(ProfileField::from_header(field.header()), Some(field));
        }
    }
}
