use serde::Serialize;
use strum_macros::EnumString;

/// The twelve NPB franchises.
///
/// `Display`/`FromStr` use the full official name as shown in team pickers,
/// e.g. `中日ドラゴンズ`. [`Team::short_name`] gives the abbreviated form
/// used on npb.jp schedule and score pages, e.g. `中日`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumString,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
pub enum Team {
    #[strum(serialize = "中日ドラゴンズ")]
    ChunichiDragons,
    #[strum(serialize = "読売ジャイアンツ")]
    YomiuriGiants,
    #[strum(serialize = "阪神タイガース")]
    HanshinTigers,
    #[strum(serialize = "広島東洋カープ")]
    HiroshimaCarp,
    #[strum(serialize = "横浜DeNAベイスターズ")]
    YokohamaBayStars,
    #[strum(serialize = "東京ヤクルトスワローズ")]
    YakultSwallows,
    #[strum(serialize = "オリックス・バファローズ")]
    OrixBuffaloes,
    #[strum(serialize = "福岡ソフトバンクホークス")]
    SoftBankHawks,
    #[strum(serialize = "千葉ロッテマリーンズ")]
    LotteMarines,
    #[strum(serialize = "東北楽天ゴールデンイーグルス")]
    RakutenEagles,
    #[strum(serialize = "北海道日本ハムファイターズ")]
    NipponHamFighters,
    #[strum(serialize = "埼玉西武ライオンズ")]
    SeibuLions,
}

impl Team {
    pub const ALL: [Team; 12] = [
        Team::ChunichiDragons,
        Team::YomiuriGiants,
        Team::HanshinTigers,
        Team::HiroshimaCarp,
        Team::YokohamaBayStars,
        Team::YakultSwallows,
        Team::OrixBuffaloes,
        Team::SoftBankHawks,
        Team::LotteMarines,
        Team::RakutenEagles,
        Team::NipponHamFighters,
        Team::SeibuLions,
    ];

    /// Full official name, e.g. `読売ジャイアンツ`.
    pub fn display_name(self) -> &'static str {
        self.into()
    }

    /// Abbreviated name as printed on npb.jp pages, e.g. `巨人`.
    pub fn short_name(self) -> &'static str {
        match self {
            Team::ChunichiDragons => "中日",
            Team::YomiuriGiants => "巨人",
            Team::HanshinTigers => "阪神",
            Team::HiroshimaCarp => "広島",
            Team::YokohamaBayStars => "DeNA",
            Team::YakultSwallows => "ヤクルト",
            Team::OrixBuffaloes => "オリックス",
            Team::SoftBankHawks => "ソフトバンク",
            Team::LotteMarines => "ロッテ",
            Team::RakutenEagles => "楽天",
            Team::NipponHamFighters => "日本ハム",
            Team::SeibuLions => "西武",
        }
    }

    /// Looks a team up by its abbreviated npb.jp name.
    pub fn from_short_name(name: &str) -> Option<Team> {
        Team::ALL.iter().copied().find(|t| t.short_name() == name)
    }
}

/// Maps a team name to the abbreviated form used on npb.jp pages.
///
/// Unknown names pass through unchanged so free-text opponents keep working.
pub(crate) fn short_name_for(name: &str) -> String {
    name.parse::<Team>()
        .map(|t| t.short_name().to_string())
        .unwrap_or_else(|_| name.to_string())
}

/// Maps an abbreviated npb.jp name back to the full official name.
///
/// Unknown names pass through unchanged.
pub(crate) fn display_name_for(name: &str) -> String {
    Team::from_short_name(name)
        .map(|t| t.display_name().to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse_round_trip() {
        for team in Team::ALL {
            let displayed = team.to_string();
            assert_eq!(displayed.parse::<Team>().ok(), Some(team));
            assert_eq!(team.display_name(), displayed);
        }
    }

    #[test]
    fn test_short_name_mapping() {
        assert_eq!(short_name_for("読売ジャイアンツ"), "巨人");
        assert_eq!(short_name_for("横浜DeNAベイスターズ"), "DeNA");
        assert_eq!(display_name_for("ヤクルト"), "東京ヤクルトスワローズ");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(short_name_for("侍ジャパン"), "侍ジャパン");
        assert_eq!(display_name_for("侍ジャパン"), "侍ジャパン");
    }
}
