//! 页面访问日志表迁移
//!
//! 创建 page_views 表，每次页面访问写入一行，写入后不再修改：
//! - 页面路径与访客标识
//! - 来源 (referrer) 与原始 UserAgent
//! - 写入时分类好的设备类型与浏览器
//! - 预留的地理位置字段 (country, city)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PageViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageViews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PageViews::PagePath)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PageViews::VisitorId).string_len(64).null())
                    .col(ColumnDef::new(PageViews::UserAgent).text().null())
                    .col(ColumnDef::new(PageViews::Referrer).text().null())
                    .col(ColumnDef::new(PageViews::DeviceType).string_len(16).null())
                    .col(ColumnDef::new(PageViews::Browser).string_len(16).null())
                    .col(ColumnDef::new(PageViews::Country).string_len(2).null())
                    .col(ColumnDef::new(PageViews::City).string_len(100).null())
                    .col(
                        ColumnDef::new(PageViews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 全量读取按 created_at 倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_page_views_created_at")
                    .table(PageViews::Table)
                    .col(PageViews::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_page_views_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PageViews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PageViews {
    #[sea_orm(iden = "page_views")]
    Table,
    Id,
    PagePath,
    VisitorId,
    UserAgent,
    Referrer,
    DeviceType,
    Browser,
    Country,
    City,
    CreatedAt,
}
