use validator::Validate;

use crate::{
    entities::block::{Block, NewBlock, ReorderBlocksRequest, UpdateBlockRequest},
    errors::AppError,
    repositories::blocks::BlockRepository,
};

pub struct BlockHandler<R>
where
    R: BlockRepository,
{
    pub block_repo: R,
}

impl<R> BlockHandler<R>
where
    R: BlockRepository,
{
    pub fn new(block_repo: R) -> Self {
        BlockHandler { block_repo }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Block>, AppError> {
        self.block_repo.list_blocks(active_only).await
    }

    pub async fn create(&self, block: NewBlock) -> Result<Block, AppError> {
        block.validate()?;
        self.block_repo.create_block(&block).await
    }

    pub async fn update(&self, id: i64, block: UpdateBlockRequest) -> Result<Block, AppError> {
        block.validate()?;
        match self.block_repo.update_block(id, &block).await? {
            Some(updated) => Ok(updated),
            None => Err(AppError::NotFound("Block not found".into())),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.block_repo.delete_block(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Block not found".into()))
        }
    }

    pub async fn reorder(&self, request: ReorderBlocksRequest) -> Result<Vec<Block>, AppError> {
        if request.ordered_ids.is_empty() {
            return Err(AppError::BadRequest("orderedIds cannot be empty".into()));
        }

        self.block_repo.reorder_blocks(&request.ordered_ids).await?;
        self.block_repo.list_blocks(false).await
    }
}
