pub mod stage1_tables;
pub mod stage2_ranks;
pub mod stage3_aggregate;
pub mod stage4_report;
