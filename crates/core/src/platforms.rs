/// Maps the 4-character prefix of a target id to a platform name.
pub trait PlatformDb {
    fn platform_name(&self, prefix: &str) -> Option<String>;
}

/// Prefix of a target id used for platform lookup.
pub fn target_prefix(target_id: &str) -> &str {
    match target_id.char_indices().nth(4) {
        Some((idx, _)) => &target_id[..idx],
        None => target_id,
    }
}

/// Platform name for a full target id, through `db`.
pub fn platform_for(db: &dyn PlatformDb, target_id: Option<&str>) -> Option<String> {
    target_id.and_then(|id| db.platform_name(target_prefix(id)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPlatforms;

impl PlatformDb for BuiltinPlatforms {
    fn platform_name(&self, prefix: &str) -> Option<String> {
        MANUFACTURE_IDS
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(prefix))
            .map(|(_, name)| name.to_string())
    }
}

const MANUFACTURE_IDS: &[(&str, &str)] = &[
    ("0200", "KL25Z"),
    ("0210", "KL05Z"),
    ("0220", "KL46Z"),
    ("0230", "K20D50M"),
    ("0231", "K22F"),
    ("0240", "K64F"),
    ("0245", "K64F"),
    ("0250", "KW24D"),
    ("0261", "KL27Z"),
    ("0300", "MTS_GAMBIT"),
    ("0305", "MTS_MDOT_F405RG"),
    ("0310", "MTS_DRAGONFLY_F411RE"),
    ("0400", "MAXWSNENV"),
    ("0405", "MAX32600MBED"),
    ("0700", "NUCLEO_F103RB"),
    ("0705", "NUCLEO_F302R8"),
    ("0710", "NUCLEO_L152RE"),
    ("0715", "NUCLEO_L053R8"),
    ("0720", "NUCLEO_F401RE"),
    ("0725", "NUCLEO_F030R8"),
    ("0730", "NUCLEO_F072RB"),
    ("0735", "NUCLEO_F334R8"),
    ("0740", "NUCLEO_F411RE"),
    ("0745", "NUCLEO_F303RE"),
    ("0750", "NUCLEO_F091RC"),
    ("0755", "NUCLEO_F070RB"),
    ("0760", "NUCLEO_L073RZ"),
    ("0765", "NUCLEO_L476RG"),
    ("0770", "NUCLEO_L432KC"),
    ("0775", "NUCLEO_F303K8"),
    ("0780", "NUCLEO_L011K4"),
    ("0785", "NUCLEO_F042K6"),
    ("0790", "NUCLEO_L031K6"),
    ("0795", "DISCO_F429ZI"),
    ("0805", "DISCO_L053C8"),
    ("0810", "DISCO_F334C8"),
    ("0815", "DISCO_F746NG"),
    ("0820", "DISCO_L476VG"),
    ("0824", "LPC824"),
    ("0835", "NUCLEO_F207ZG"),
    ("0840", "B96B_F446VE"),
    ("1000", "LPC2368"),
    ("1001", "LPC2460"),
    ("1010", "LPC1768"),
    ("1017", "HRM1017"),
    ("1018", "SSCI824"),
    ("1034", "LPC11U34"),
    ("1040", "LPC11U24"),
    ("1045", "LPC11U24"),
    ("1050", "LPC812"),
    ("1060", "LPC4088"),
    ("1061", "LPC11U35_401"),
    ("1062", "LPC4088_DM"),
    ("1070", "NRF51822"),
    ("1075", "NRF51822_OTA"),
    ("1080", "OC_MBUINO"),
    ("1090", "RBLAB_NRF51822"),
    ("1095", "RBLAB_BLENANO"),
    ("1100", "NRF51_DK"),
    ("1101", "NRF52_DK"),
    ("1114", "LPC1114"),
    ("1120", "NRF51_DONGLE"),
    ("1130", "NRF51822_SBK"),
    ("1140", "WALLBOT_BLE"),
    ("1168", "LPC11U68"),
    ("1200", "NCS36510"),
    ("1234", "UBLOX_C027"),
    ("1235", "UBLOX_C027"),
    ("1549", "LPC1549"),
    ("1600", "LPC4330_M4"),
    ("1605", "LPC4330_M4"),
    ("2000", "EFM32_G8XX_STK"),
    ("2005", "EFM32HG_STK3400"),
    ("2010", "EFM32WG_STK3800"),
    ("2015", "EFM32GG_STK3700"),
    ("2020", "EFM32LG_STK3600"),
    ("2025", "EFM32TG_STK3300"),
    ("2030", "EFM32ZG_STK3200"),
    ("2035", "EFM32PG_STK3401"),
    ("2100", "XBED_LPC1768"),
    ("2201", "WIZWIKI_W7500"),
    ("2202", "WIZWIKI_W7500ECO"),
    ("2203", "WIZWIKI_W7500P"),
    ("3001", "LPC11U24"),
    ("4000", "LPC11U35_Y5_MBUG"),
    ("4005", "NRF51822_Y5_MBUG"),
    ("4100", "MOTE_L152RC"),
    ("4337", "LPC4337"),
    ("4500", "DELTA_DFCM_NNN40"),
    ("5000", "ARM_MPS2"),
    ("5001", "ARM_MPS2_M0"),
    ("5003", "ARM_MPS2_M0P"),
    ("5005", "ARM_MPS2_M0DS"),
    ("5007", "ARM_MPS2_M1"),
    ("5009", "ARM_MPS2_M3"),
    ("5011", "ARM_MPS2_M4"),
    ("5015", "ARM_MPS2_M7"),
    ("5020", "HOME_GATEWAY_6LOWPAN"),
    ("5500", "RZ_A1H"),
    ("6660", "NZ32_SC151"),
    ("7010", "BLUENINJA_CDP_TZ01B"),
    ("7778", "TEENSY3_1"),
    ("8001", "UNO_91H"),
    ("9001", "LPC1347"),
    ("9002", "LPC11U24"),
    ("9003", "LPC1347"),
    ("9004", "ARCH_PRO"),
    ("9006", "LPC11U24"),
    ("9007", "LPC11U35_501"),
    ("9008", "XADOW_M0"),
    ("9009", "ARCH_BLE"),
    ("9010", "ARCH_GPRS"),
    ("9011", "ARCH_MAX"),
    ("9012", "SEEED_TINY_BLE"),
    ("FFFF", "K20 BOOTLOADER"),
    ("RIOT", "RIOT"),
];
