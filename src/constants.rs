/// 能力值与难度的取值下界
pub const SCORE_MIN: f64 = 0.0;

/// 能力值与难度的取值上界
pub const SCORE_MAX: f64 = 100.0;

/// 新用户默认能力值（中点）
pub const DEFAULT_ABILITY: f64 = 50.0;

/// 缺失难度时使用的默认难度
pub const DEFAULT_DIFFICULTY: f64 = 50.0;

/// Elo 更新灵敏度 K
pub const ELO_K: f64 = 4.0;

/// Logistic 期望得分的尺度
pub const ELO_SCALE: f64 = 15.0;

/// 复习间隔阶梯（小时）：4h, 8h, 1d, 3d, 7d, 21d, 60d
pub const SRS_LADDER_HOURS: [f64; 7] = [4.0, 8.0, 24.0, 72.0, 168.0, 504.0, 1440.0];

/// 前沿词目标难度相对能力值的偏移（期望正确率约 70%）
pub const FRONTIER_OFFSET: f64 = 13.0;

/// 到期错词桶占比
pub const DUE_WRONG_SHARE: f64 = 0.4;

/// 前沿词桶占比
pub const FRONTIER_SHARE: f64 = 0.4;

/// 弱词模式的正确率阈值
pub const WEAK_ACCURACY_THRESHOLD: f64 = 0.6;

/// 分层抽样的难度分段数
pub const DIFFICULTY_QUINTILES: usize = 5;

/// 单次选词数量上限
pub const MAX_SESSION_WORDS: usize = 50;

/// 定级测验数量上限
pub const MAX_PLACEMENT_WORDS: usize = 10;

/// 定级测验默认数量
pub const DEFAULT_PLACEMENT_WORDS: usize = 5;

/// 干扰项候选池默认容量
pub const DEFAULT_DISTRACTOR_POOL_SIZE: usize = 60;

/// 干扰项“邻近”难度半径
pub const DISTRACTOR_NEARBY_RADIUS: f64 = 20.0;

/// 每题选项数
pub const OPTIONS_PER_QUESTION: usize = 3;

/// 能力日志分页默认/最大数量
pub const DEFAULT_ABILITY_LOG_LIMIT: usize = 20;
pub const MAX_ABILITY_LOG_LIMIT: usize = 100;

/// 练习历史返回的最近场次数
pub const PRACTICE_HISTORY_LIMIT: usize = 50;

/// 每小时毫秒数
pub const MILLIS_PER_HOUR: i64 = 3_600_000;
